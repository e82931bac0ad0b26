//! One-shot mesh loading.
//!
//! The page fetches the mesh asset once per load: a single task is
//! dispatched, one result comes back (buffers or an error), and the channel
//! is consumed. No pooling, no retries, no second request — a failure simply
//! means the scene keeps its placeholder geometry.

use futures::channel::oneshot;
use thiserror::Error;

use crate::mesh::{MeshBuffers, ObjError};

/// Failure modes for the fetch-and-parse task.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("mesh request returned HTTP status {0}")]
    HttpStatus(u16),
    #[error("mesh request failed: {0}")]
    Network(String),
    #[error("mesh parse failed: {0}")]
    Parse(#[from] ObjError),
    #[error("mesh task ended without delivering a result")]
    Cancelled,
}

pub type MeshResult = Result<MeshBuffers, LoadError>;

/// Create the single-completion channel the loader task delivers through.
pub fn mesh_channel() -> (MeshSender, MeshReceiver) {
    let (tx, rx) = oneshot::channel();
    (MeshSender(tx), MeshReceiver(Some(rx)))
}

/// Sending half: consumed by delivery, so a task can report exactly once.
pub struct MeshSender(oneshot::Sender<MeshResult>);

impl MeshSender {
    /// Deliver the task's result. If the receiver is already gone the result
    /// is dropped, which is fine — nobody is waiting.
    pub fn deliver(self, result: MeshResult) {
        let _ = self.0.send(result);
    }
}

/// Receiving half, polled once per frame by the render loop.
pub struct MeshReceiver(Option<oneshot::Receiver<MeshResult>>);

impl MeshReceiver {
    /// Non-blocking poll. Yields `Some` at most once; a dropped sender shows
    /// up as [`LoadError::Cancelled`].
    pub fn try_take(&mut self) -> Option<MeshResult> {
        let rx = self.0.as_mut()?;
        match rx.try_recv() {
            Ok(Some(result)) => {
                self.0 = None;
                Some(result)
            }
            Ok(None) => None,
            Err(_cancelled) => {
                self.0 = None;
                Some(Err(LoadError::Cancelled))
            }
        }
    }

    /// Whether a result is still possible.
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

/// Dispatch the fetch-and-parse task for the mesh asset.
///
/// Runs off the render loop; the result lands in the paired receiver.
#[cfg(target_arch = "wasm32")]
pub fn spawn_fetch(url: String, sender: MeshSender) {
    wasm_bindgen_futures::spawn_local(async move {
        sender.deliver(fetch_and_parse(&url).await);
    });
}

#[cfg(target_arch = "wasm32")]
async fn fetch_and_parse(url: &str) -> MeshResult {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| LoadError::Network("no window".into()))?;

    let response_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| LoadError::Network(format!("{:?}", e)))?;
    let response: web_sys::Response = response_value
        .dyn_into()
        .map_err(|_| LoadError::Network("fetch did not yield a Response".into()))?;

    if !response.ok() {
        return Err(LoadError::HttpStatus(response.status()));
    }

    let text_promise = response
        .text()
        .map_err(|e| LoadError::Network(format!("{:?}", e)))?;
    let text_value = JsFuture::from(text_promise)
        .await
        .map_err(|e| LoadError::Network(format!("{:?}", e)))?;
    let text = text_value
        .as_string()
        .ok_or_else(|| LoadError::Network("response body was not text".into()))?;

    Ok(crate::mesh::parse_obj(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_is_taken_exactly_once() {
        let (tx, mut rx) = mesh_channel();
        assert!(rx.try_take().is_none());
        assert!(rx.is_pending());

        tx.deliver(Ok(MeshBuffers::default()));

        assert!(matches!(rx.try_take(), Some(Ok(_))));
        assert!(rx.try_take().is_none());
        assert!(!rx.is_pending());
    }

    #[test]
    fn test_dropped_sender_reports_cancellation() {
        let (tx, mut rx) = mesh_channel();
        drop(tx);

        assert!(matches!(rx.try_take(), Some(Err(LoadError::Cancelled))));
        assert!(rx.try_take().is_none());
    }

    #[test]
    fn test_errors_pass_through() {
        let (tx, mut rx) = mesh_channel();
        tx.deliver(Err(LoadError::HttpStatus(404)));

        assert!(matches!(
            rx.try_take(),
            Some(Err(LoadError::HttpStatus(404)))
        ));
    }
}
