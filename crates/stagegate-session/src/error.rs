use stagegate_store::StoreError;

/// Errors surfaced by session operations.
///
/// Validation rejections are not errors; they come back as
/// [`AdvanceOutcome::Rejected`](crate::AdvanceOutcome).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
  /// A read or write against the backing store failed.
  #[error(transparent)]
  Store(#[from] StoreError),
}
