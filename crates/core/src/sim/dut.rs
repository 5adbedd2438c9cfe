//! Interface to the design under test.
//!
//! The simulation kernel and pin bindings live behind this trait. The
//! testbench only ever drives request ports, advances the clock, and reads
//! back whatever responses the design produced on that edge.

use crate::model::request::{Query, Update};
use crate::sim::response::Response;

/// A clocked design exposing an update port, a query port and their responses.
pub trait Dut {
    /// Returns the design to its post-reset state (every bucket empty).
    fn reset(&mut self) {}

    /// Whether the design accepts a request on the next edge.
    fn ready(&self) -> bool {
        true
    }

    /// Drives the update port; `None` idles it.
    fn drive_update(&mut self, update: Option<&Update>);

    /// Drives the query port; `None` idles it.
    fn drive_query(&mut self, query: Option<&Query>);

    /// Advances one clock cycle and returns the responses valid after the edge.
    fn clock(&mut self) -> Vec<Response>;
}

impl<D: Dut + ?Sized> Dut for Box<D> {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn ready(&self) -> bool {
        (**self).ready()
    }

    fn drive_update(&mut self, update: Option<&Update>) {
        (**self).drive_update(update);
    }

    fn drive_query(&mut self, query: Option<&Query>) {
        (**self).drive_query(query);
    }

    fn clock(&mut self) -> Vec<Response> {
        (**self).clock()
    }
}
