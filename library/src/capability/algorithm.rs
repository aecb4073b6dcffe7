//! Algorithm capability: numbered input and output ports.

use log::debug;

use crate::core::Interface;
use crate::core::interface::PortLayout;
use crate::model::{Ports, State};

/// Declares `inputs` input ports and `outputs` output ports.
///
/// Input operations exist only when `inputs > 0`, output operations only
/// when `outputs > 0`. Output ports also require an `update` operation,
/// checked when the constructor finishes.
pub fn algo(api: &mut Interface, model: &mut State, inputs: usize, outputs: usize) {
    debug!("Declaring {} input and {} output ports", inputs, outputs);
    api.ports = Some(PortLayout { inputs, outputs });
    model.ports = Some(Ports::with_counts(inputs, outputs));
}
