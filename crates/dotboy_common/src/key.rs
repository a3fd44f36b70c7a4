/// Host keyboard keys understood by the emulator frontends.
///
/// Frontends translate their native key codes into this enum so the
/// emulation cores never depend on a windowing library.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    A,
    S,
    Z,
    X,
    Return,
    Space,
    None,
}
