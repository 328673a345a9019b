//! Message types for worker-to-UI communication

/// Events sent from the detection worker to the render thread
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A detection cycle committed a new overlay set
    OverlaysUpdated {
        /// Store cycle number stamped on the new set
        cycle: u64,
    },
    /// The engine rejected a frame; the previous overlays stay displayed
    DetectionFailed {
        /// Engine error, already formatted for logs
        message: String,
    },
}
