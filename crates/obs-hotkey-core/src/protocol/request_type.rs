//! Request type names used by the built-in actions.

/// Query recording state (`outputActive`, `outputPaused`).
pub const GET_RECORD_STATUS: &str = "GetRecordStatus";
/// Start recording.
pub const START_RECORDING: &str = "StartRecord";
/// Stop recording.
pub const STOP_RECORDING: &str = "StopRecord";
/// Pause an active recording.
pub const PAUSE_RECORDING: &str = "PauseRecord";
/// Resume a paused recording.
pub const RESUME_RECORDING: &str = "ResumeRecord";
/// Server-side recording toggle.
pub const TOGGLE_RECORD: &str = "ToggleRecord";
/// Server-side pause toggle.
pub const TOGGLE_RECORD_PAUSE: &str = "ToggleRecordPause";
/// Server-side streaming toggle.
pub const TOGGLE_STREAM: &str = "ToggleStream";
/// Save the replay buffer to disk.
pub const SAVE_REPLAY_BUFFER: &str = "SaveReplayBuffer";
