/// Opaque image handle owned by the presentation layer. The simulation only
/// stores and swaps these; it never inspects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u32);

/// Sprite currently shown for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub handle: SpriteHandle,
    /// Draw order; lower values are drawn first.
    pub z_index: i32,
}

impl Sprite {
    pub fn new(handle: SpriteHandle) -> Self {
        Self { handle, z_index: 0 }
    }
}
