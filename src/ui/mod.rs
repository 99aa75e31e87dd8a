//! UI contributions: component patch hooks and stylesheets.
//!
//! The crate never touches a UI framework. It produces an ordered set of
//! [`PatchHook`]s; the host's adapter implements [`ComponentInstance`] and
//! calls [`PatchHook::on_created`] for every new component.

mod component;
mod patch;
mod styles;

pub use component::{ComponentInstance, ComputedGetter, StaticComponent};
pub use patch::{
    ComponentMatcher, ComponentPatchRule, ComponentPredicate, ComputedFn, ComputedOverride,
    DataOverride, DataTransform, PatchHook, apply_patches, compose_patches,
};
pub use styles::collect_stylesheets;
