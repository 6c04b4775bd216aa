//! Depth-first traversal of a box tree.
//!
//! The walker keeps one frame per nesting level on an explicit stack, each
//! frame holding the sibling bytes not yet visited at that level. Input
//! controls the nesting depth, so the traversal never recurses on the call
//! stack.

use crate::boxes::BoxHeader;
use crate::known_boxes::is_container;
use crate::view::BoxView;
use log::{debug, trace};

/// Returned by the visitor to steer descent into the box just visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Do not descend into this box; siblings are still visited.
    SkipChildren,
}

/// One emitted box.
#[derive(Debug, Clone, Copy)]
pub struct BoxVisit<'a> {
    /// Exactly the bytes the box occupies.
    pub view: BoxView<'a>,
    pub header: BoxHeader,
    /// Offset of the first header byte within the walked buffer.
    pub offset: usize,
    /// 0 for top-level boxes.
    pub depth: usize,
    /// No further box is emitted at this level.
    pub is_last: bool,
}

impl<'a> BoxVisit<'a> {
    /// Header plus content length.
    pub fn len(&self) -> usize {
        self.view.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.as_bytes().is_empty()
    }

    pub fn end(&self) -> usize {
        self.offset + self.len()
    }

    pub fn content(&self) -> &'a [u8] {
        self.view.content_data().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Deepest level emitted; `None` walks everything present.
    pub max_depth: Option<usize>,
}

struct Frame<'a> {
    rest: &'a [u8],
    offset: usize,
}

/// Parse the box at the front of `data`: its header and the bytes it occupies.
fn front_box(data: &[u8]) -> Option<(BoxHeader, &[u8])> {
    let view = BoxView::new(data);
    let header = view.header().ok()?;
    let bytes = view.box_bytes().ok()?;
    Some((header, bytes))
}

/// Whether another emitted box follows at this level, looking past boxes
/// that would be suppressed.
fn has_visible_box(mut rest: &[u8]) -> bool {
    while let Some((header, bytes)) = front_box(rest) {
        if header.typ.is_printable() {
            return true;
        }
        if header.content_size.is_none() {
            return false;
        }
        rest = &rest[bytes.len()..];
    }
    false
}

pub struct Walker<'a> {
    data: &'a [u8],
    options: WalkOptions,
}

impl<'a> Walker<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            options: WalkOptions::default(),
        }
    }

    pub fn with_options(data: &'a [u8], options: WalkOptions) -> Self {
        Self { data, options }
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }

    /// Visit every box in depth-first pre-order.
    ///
    /// Boxes whose type is not printable ASCII are skipped over without
    /// being emitted or descended into. A box without a declared size ends
    /// its level.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&BoxVisit<'a>) -> Flow,
    {
        let mut stack = vec![Frame {
            rest: self.data,
            offset: 0,
        }];

        while let Some(depth) = stack.len().checked_sub(1) {
            let top = &mut stack[depth];
            let Some((header, bytes)) = front_box(top.rest) else {
                if !top.rest.is_empty() {
                    debug!(
                        "{} trailing bytes at depth {depth} offset {:#x} do not parse as a box",
                        top.rest.len(),
                        top.offset
                    );
                }
                stack.pop();
                continue;
            };
            trace!("{:#x} depth {depth}: {header:?}", top.offset);

            let offset = top.offset;
            if header.content_size.is_some() {
                top.rest = &top.rest[bytes.len()..];
                top.offset += bytes.len();
            } else {
                top.rest = &[];
            }
            let is_last = !has_visible_box(top.rest);

            if !header.typ.is_printable() {
                debug!("suppressed box with unprintable type at {offset:#x}");
                continue;
            }

            let item = BoxVisit {
                view: BoxView::new(bytes),
                header,
                offset,
                depth,
                is_last,
            };
            if visit(&item) == Flow::SkipChildren || !is_container(header.typ) {
                continue;
            }
            if header.content_size.is_none() {
                debug!(
                    "not descending into {} at {offset:#x}: size runs to end",
                    header.typ
                );
                continue;
            }
            if self.options.max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            stack.push(Frame {
                rest: item.content(),
                offset: offset + usize::from(header.header_size),
            });
        }
    }

    /// All emitted boxes, in visit order.
    pub fn collect(&self) -> Vec<BoxVisit<'a>> {
        let mut out = Vec::new();
        self.walk(|v| {
            out.push(*v);
            Flow::Continue
        });
        out
    }
}
