//! Walking an instruction sequence against a rendering surface.

use crate::error::ProjectionError;
use crate::step::{FieldsetDown, FieldStep, Rendering, Step};
use form_validate::Kind;
use tracing::trace;

/// A rendering surface the instruction walk drives.
///
/// Implementations own the actual widgets (DOM nodes, TUI rows, a test
/// recorder); the walk only tells them what to open, emit and close, strictly
/// in sequence order. Nesting is the walker's job, so implementations can
/// stay flat and stateless beyond a current-insertion-point cursor.
pub trait Container {
    /// The walk announces the total height, in rows, before any step.
    fn set_height(&mut self, rows: u32);

    /// Open a fieldset; subsequent fields belong to it until the matching
    /// [`Container::close_fieldset`].
    fn open_fieldset(&mut self, fieldset: &FieldsetDown);

    fn close_fieldset(&mut self);

    /// Emit one leaf control of the given kind.
    fn append_field(&mut self, kind: Kind, field: &FieldStep);
}

/// Drive `container` through `rendering`'s steps, in order.
///
/// The walk enforces stack discipline: a `fieldsetUp` with no open fieldset
/// or a sequence ending with fieldsets still open is an error, and the
/// container is left however far the walk got.
pub fn render(container: &mut dyn Container, rendering: &Rendering) -> Result<(), ProjectionError> {
    container.set_height(rendering.height);
    let mut open: usize = 0;
    for (index, step) in rendering.steps.iter().enumerate() {
        match step {
            Step::FieldsetDown(fieldset) => {
                container.open_fieldset(fieldset);
                open += 1;
            }
            Step::FieldsetUp => {
                if open == 0 {
                    return Err(ProjectionError::StackUnderflow { index });
                }
                container.close_fieldset();
                open -= 1;
            }
            field => {
                // `as_field` covers every non-fieldset variant.
                if let Some((kind, f)) = field.as_field() {
                    container.append_field(kind, f);
                }
            }
        }
    }
    if open != 0 {
        return Err(ProjectionError::UnclosedFieldsets { open });
    }
    trace!(steps = rendering.steps.len(), height = rendering.height, "rendered");
    Ok(())
}
