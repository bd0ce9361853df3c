//! Scan workflow: acquisition → transfer → result/error, with reset.
//!
//! - `session.rs` - the [`ScanSession`] value and its invariants
//! - `controller.rs` - pure state machine over [`ScanEvent`]s
//! - `runner.rs` - task that drives the controller and publishes snapshots
//!
//! ```ignore
//! let handle = ScanWorkflow::spawn(Arc::new(source), Arc::new(client));
//! let session = handle.scan(|s| println!("{:?}", s.phase())).await;
//! ```

pub mod controller;
pub mod runner;
pub mod session;

pub use controller::{Effect, ScanController, ScanEvent};
pub use runner::{ScanHandle, ScanWorkflow};
pub use session::{ScanError, ScanErrorKind, ScanPhase, ScanSession, ScanState};
