//! Install session state
//!
//! One mutable session per coordinator, guarded by a mutex in the
//! coordinator. It remembers which flow is in flight, the raw argument
//! bag of that request, the one-shot responder that must be resolved
//! exactly once, and whether the flow is parked behind an OS
//! install-permission prompt.

use super::Responder;
use serde_json::Value;

/// Which flow is currently in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallOperation {
    /// No request accepted yet
    #[default]
    None,
    /// Plain install of a local APK
    Install,
    /// Download followed by install
    DownloadAndInstall,
}

impl InstallOperation {
    /// Whether the resume handler knows how to replay this operation
    pub fn is_replayable(&self) -> bool {
        matches!(self, Self::Install | Self::DownloadAndInstall)
    }
}

/// Per-coordinator request state
///
/// A new top-level request replaces the whole session; there is no queue.
/// Dropping a replaced responder closes its receiver, which is how an
/// abandoned caller finds out.
#[derive(Debug, Default)]
pub struct InstallSession {
    /// Flow in flight, written before the platform is invoked
    pub operation: InstallOperation,
    /// Raw argument bag of the in-flight request, kept for replay
    pub pending_params: Option<Value>,
    /// One-shot result handle; `None` once answered
    pub responder: Option<Responder>,
    /// True while the OS install-permission prompt blocks the flow
    pub awaiting_permission_grant: bool,
}

impl InstallSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a new request, replacing any prior state wholesale.
    ///
    /// `awaiting_permission_grant` is deliberately left untouched: only a
    /// platform `Started` event clears it.
    pub fn begin(&mut self, operation: InstallOperation, params: Value, responder: Responder) {
        self.operation = operation;
        self.pending_params = Some(params);
        self.responder = Some(responder);
    }

    /// Take the responder for terminal delivery. Returns `None` if the
    /// request was already answered or replaced.
    pub fn take_responder(&mut self) -> Option<Responder> {
        self.responder.take()
    }

    /// Take everything the resume handler needs to replay the parked
    /// flow. Returns `None` when there is nothing replayable.
    pub fn take_replay(&mut self) -> Option<(InstallOperation, Value, Responder)> {
        if !self.operation.is_replayable() {
            return None;
        }
        let params = self.pending_params.take()?;
        let responder = self.responder.take()?;
        Some((self.operation, params, responder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::MethodOutcome;
    use serde_json::json;
    use tokio::sync::oneshot;

    #[test]
    fn test_defaults() {
        let session = InstallSession::new();
        assert_eq!(session.operation, InstallOperation::None);
        assert!(session.pending_params.is_none());
        assert!(session.responder.is_none());
        assert!(!session.awaiting_permission_grant);
    }

    #[test]
    fn test_begin_replaces_state_wholesale() {
        let mut session = InstallSession::new();
        let (tx1, mut rx1) = oneshot::channel::<MethodOutcome>();
        let (tx2, _rx2) = oneshot::channel::<MethodOutcome>();

        session.begin(
            InstallOperation::Install,
            json!({"filePath": "/x/a.apk"}),
            tx1,
        );
        session.begin(
            InstallOperation::DownloadAndInstall,
            json!({"fileUrl": "http://h/b.apk"}),
            tx2,
        );

        assert_eq!(session.operation, InstallOperation::DownloadAndInstall);
        assert_eq!(
            session.pending_params,
            Some(json!({"fileUrl": "http://h/b.apk"}))
        );
        // the replaced responder's receiver observes a closed channel
        assert!(rx1.try_recv().is_err());
    }

    #[test]
    fn test_begin_keeps_permission_flag() {
        let mut session = InstallSession::new();
        session.awaiting_permission_grant = true;

        let (tx, _rx) = oneshot::channel::<MethodOutcome>();
        session.begin(InstallOperation::Install, json!({}), tx);

        assert!(session.awaiting_permission_grant);
    }

    #[test]
    fn test_take_responder_is_consumed() {
        let mut session = InstallSession::new();
        let (tx, _rx) = oneshot::channel::<MethodOutcome>();
        session.begin(InstallOperation::Install, json!({}), tx);

        assert!(session.take_responder().is_some());
        assert!(session.take_responder().is_none());
    }

    #[test]
    fn test_take_replay_requires_replayable_operation() {
        let mut session = InstallSession::new();
        assert!(session.take_replay().is_none());

        let (tx, _rx) = oneshot::channel::<MethodOutcome>();
        session.begin(
            InstallOperation::DownloadAndInstall,
            json!({"fileName": "a.apk"}),
            tx,
        );

        let (operation, params, _responder) = session.take_replay().unwrap();
        assert_eq!(operation, InstallOperation::DownloadAndInstall);
        assert_eq!(params, json!({"fileName": "a.apk"}));

        // a second replay has nothing left to take
        assert!(session.take_replay().is_none());
    }

    #[test]
    fn test_take_replay_after_answer_yields_nothing() {
        let mut session = InstallSession::new();
        let (tx, _rx) = oneshot::channel::<MethodOutcome>();
        session.begin(InstallOperation::Install, json!({}), tx);

        let _ = session.take_responder();
        assert!(session.take_replay().is_none());
    }
}
