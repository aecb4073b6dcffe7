//! Base capability: modification tracking, lineage and teardown.

use crate::core::Interface;
use crate::model::State;

/// Root tag of every lineage.
pub const OBJECT_CLASS: &str = "Object";

/// Installs `modified`, `on_modified`, `mtime`, `is_a`, `class_name`,
/// generic `set`/`get` and `delete`.
///
/// Must run first: later capabilities chain their cleanup after this one.
pub fn obj(api: &mut Interface, model: &mut State) {
    model.mtime = model.clock().now();
    model.class_hierarchy = vec![OBJECT_CLASS.to_string()];
    api.object_installed = true;

    let subscribers = api.modified_subscribers.clone();
    api.on_delete(move |state| {
        state.clear();
        subscribers.release_all();
    });
}
