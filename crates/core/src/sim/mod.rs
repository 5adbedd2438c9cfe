//! Testbench driver and the interface to the design under test.
//!
//! Provides the [`Dut`] trait the simulation kernel implements, the
//! response types read back from the design, and the [`Testbench`] that
//! ties generator, reference store and scoreboards to a design.

/// Design-under-test interface.
pub mod dut;

/// Responses observed on the design's output ports.
pub mod response;

/// Clocked testbench driver.
pub mod testbench;

pub use dut::Dut;
pub use response::{Response, UpdateFault};
pub use testbench::{RunReport, Testbench};
