//! Terminal mirror of the live output slots
//!
//! Status snapshots redraw a single line; answer snapshots are printed
//! incrementally. Everything goes to stderr so stdout carries only the final
//! message.

use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

const CLEAR_LINE: &str = "\r\x1b[2K";

/// What has already been written to the terminal
#[derive(Debug, Default)]
struct Screen {
    answer: String,
    status_visible: bool,
}

impl Screen {
    fn status(&mut self, text: &str) -> String {
        let mut out = String::new();
        if !self.answer.is_empty() {
            out.push('\n');
            self.answer.clear();
        }
        out.push_str(CLEAR_LINE);
        out.push_str(text);
        self.status_visible = true;
        out
    }

    fn answer(&mut self, text: &str) -> String {
        let mut out = String::new();
        if self.status_visible {
            out.push_str(CLEAR_LINE);
            self.status_visible = false;
        }

        match text.strip_prefix(self.answer.as_str()) {
            Some(rest) => out.push_str(rest),
            None => {
                out.push('\n');
                out.push_str(text);
            }
        }
        text.clone_into(&mut self.answer);
        out
    }

    fn finish(&self) -> &'static str {
        if self.status_visible {
            CLEAR_LINE
        } else if self.answer.is_empty() {
            ""
        } else {
            "\n"
        }
    }
}

/// Write live snapshots to stderr until `shutdown` is cancelled
pub async fn mirror(
    mut answer: watch::Receiver<String>,
    mut status: watch::Receiver<String>,
    shutdown: CancellationToken,
) {
    let mut stderr = tokio::io::stderr();
    let mut screen = Screen::default();

    loop {
        let out = tokio::select! {
            () = shutdown.cancelled() => break,
            Ok(()) = status.changed() => {
                let text = status.borrow_and_update().clone();
                screen.status(&text)
            }
            Ok(()) = answer.changed() => {
                let text = answer.borrow_and_update().clone();
                screen.answer(&text)
            }
            else => break,
        };

        if stderr.write_all(out.as_bytes()).await.is_err() || stderr.flush().await.is_err() {
            return;
        }
    }

    let _ = stderr.write_all(screen.finish().as_bytes()).await;
    let _ = stderr.flush().await;
}
