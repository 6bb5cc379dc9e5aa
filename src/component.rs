//! Component Descriptors - Requests to mount a render function with props.
//!
//! A descriptor is immutable and cheap to clone. It can sit anywhere inside a
//! [`Node`] tree; the reconciler finds it and replaces it with the output of
//! a live component instance.
//!
//! # Identity
//!
//! Two descriptors name the same component when they wrap the same function:
//!
//! - a `fn` item or closure expression: its type, unique per definition
//! - a function pointer `fn(&Props) -> RenderResult`: its address
//! - a `Box<dyn Fn(&Props) -> RenderResult>`: the allocation, shared by every
//!   clone of the [`RenderFn`] that took it
//!
//! ```ignore
//! component(counter, Props::new())            // same identity on every render
//! component(move |p| row(p, &log), props)     // same identity for this closure site
//! component(PAGES[index], props)              // one identity per page function
//! ```
//!
//! A `fn` item passed directly and the same function passed as a pointer are
//! different components. Values captured by a closure are not part of its
//! identity. Data that should trigger a re-render belongs in props.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::node::Node;
use crate::props::{CHILDREN, Props};

/// Signature of a render function.
pub type RenderResult = Result<Node>;

// =============================================================================
// RenderFn
// =============================================================================

/// Function pointer form of a render function.
pub type RenderFnPtr = fn(&Props) -> RenderResult;

/// Boxed form of a render function.
pub type BoxedRenderFn = Box<dyn Fn(&Props) -> RenderResult>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Identity {
    /// `fn` items and closures: one type per definition.
    Type(TypeId),
    /// Function pointers share a type; the address tells them apart.
    Address(usize),
    /// Boxed trait objects: the shared allocation.
    Allocation(usize),
}

/// A shared render function with a stable identity.
#[derive(Clone)]
pub struct RenderFn {
    identity: Identity,
    name: &'static str,
    func: Rc<dyn Fn(&Props) -> RenderResult>,
}

impl RenderFn {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Props) -> RenderResult + 'static,
    {
        let any: &dyn Any = &func;
        let identity = match any.downcast_ref::<RenderFnPtr>() {
            Some(ptr) => Some(Identity::Address(*ptr as usize)),
            None if any.is::<BoxedRenderFn>() => None,
            None => Some(Identity::Type(TypeId::of::<F>())),
        };

        let func: Rc<dyn Fn(&Props) -> RenderResult> = Rc::new(func);
        let identity = identity
            .unwrap_or_else(|| Identity::Allocation(Rc::as_ptr(&func) as *const () as usize));
        Self {
            identity,
            name: std::any::type_name::<F>(),
            func,
        }
    }

    /// Whether both wrap the same function.
    pub fn same(&self, other: &RenderFn) -> bool {
        self.identity == other.identity
    }

    /// Place this function in an output tree.
    pub fn describe(&self, props: Props) -> Node {
        Node::Component(Descriptor::from_render_fn(self.clone(), props))
    }

    /// Type name of the wrapped function, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn call(&self, props: &Props) -> RenderResult {
        (self.func)(props)
    }
}

impl fmt::Debug for RenderFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderFn({})", self.name)
    }
}

// =============================================================================
// Descriptor
// =============================================================================

struct DescriptorInner {
    render: RenderFn,
    props: Props,
}

/// An immutable `(render function, props)` pair.
#[derive(Clone)]
pub struct Descriptor(Rc<DescriptorInner>);

impl Descriptor {
    pub fn new<F>(render: F, props: Props) -> Self
    where
        F: Fn(&Props) -> RenderResult + 'static,
    {
        Self::from_render_fn(RenderFn::new(render), props)
    }

    pub fn from_render_fn(render: RenderFn, props: Props) -> Self {
        Self(Rc::new(DescriptorInner { render, props }))
    }

    pub fn render_fn(&self) -> &RenderFn {
        &self.0.render
    }

    pub fn props(&self) -> &Props {
        &self.0.props
    }

    pub fn name(&self) -> &'static str {
        self.0.render.name()
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.0.render.same(&other.0.render) && self.0.props == other.0.props)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("render", &self.0.render.name)
            .field("props", &self.0.props)
            .finish()
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Place a component in an output tree.
pub fn component<F>(render: F, props: Props) -> Node
where
    F: Fn(&Props) -> RenderResult + 'static,
{
    Node::Component(Descriptor::new(render, props))
}

/// Place a component with nested nodes stored under `children`.
pub fn component_with_children<F>(render: F, props: Props, children: Vec<Node>) -> Node
where
    F: Fn(&Props) -> RenderResult + 'static,
{
    component(render, props.with(CHILDREN, Node::List(children)))
}
