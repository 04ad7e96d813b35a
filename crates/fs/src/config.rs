/// Batch size for sending entries through the channel.
/// Larger batches reduce channel overhead but increase latency.
pub const BATCH_SIZE: usize = 64;

/// Poll interval for idle walker threads checking whether all work is done.
pub const IDLE_POLL_MS: u64 = 50;
