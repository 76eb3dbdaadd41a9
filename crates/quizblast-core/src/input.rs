use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Maximum encoded input size in bytes.
pub const MAX_INPUT_SIZE: usize = 64;

/// One of the four cardinal directions. World Y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector pointing this way.
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Input sampled once per tick: at most one movement intent plus a fire flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_dir: Option<Direction>,
    pub fire: bool,
}

impl TickInput {
    pub fn moving(dir: Direction) -> Self {
        Self {
            move_dir: Some(dir),
            fire: false,
        }
    }

    pub fn firing() -> Self {
        Self {
            move_dir: None,
            fire: true,
        }
    }
}

#[derive(Debug)]
pub enum InputError {
    Empty,
    TooLarge(usize),
    Encode(String),
    Decode(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty input payload"),
            Self::TooLarge(size) => {
                write!(f, "input too large: {size} bytes (max {MAX_INPUT_SIZE})")
            },
            Self::Encode(e) => write!(f, "encode error: {e}"),
            Self::Decode(e) => write!(f, "decode error: {e}"),
        }
    }
}

impl std::error::Error for InputError {}

/// Encode a tick input as MessagePack for hosts that ship input as bytes.
pub fn encode_input(input: &TickInput) -> Result<Vec<u8>, InputError> {
    let bytes = rmp_serde::to_vec(input).map_err(|e| InputError::Encode(e.to_string()))?;
    if bytes.len() > MAX_INPUT_SIZE {
        return Err(InputError::TooLarge(bytes.len()));
    }
    Ok(bytes)
}

/// Decode a tick input produced by [`encode_input`].
pub fn decode_input(data: &[u8]) -> Result<TickInput, InputError> {
    if data.is_empty() {
        return Err(InputError::Empty);
    }
    if data.len() > MAX_INPUT_SIZE {
        return Err(InputError::TooLarge(data.len()));
    }
    rmp_serde::from_slice(data).map_err(|e| InputError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_axis_aligned() {
        for dir in Direction::ALL {
            let u = dir.unit();
            assert_eq!(u.length(), 1.0);
            assert_eq!(dir.is_horizontal(), u.y == 0.0);
        }
    }

    #[test]
    fn input_codec_roundtrip() {
        let input = TickInput {
            move_dir: Some(Direction::Left),
            fire: true,
        };
        let bytes = encode_input(&input).unwrap();
        assert_eq!(decode_input(&bytes).unwrap(), input);
    }

    #[test]
    fn decode_empty_rejected() {
        assert!(matches!(decode_input(&[]), Err(InputError::Empty)));
    }

    #[test]
    fn decode_oversized_rejected() {
        let data = vec![0u8; MAX_INPUT_SIZE + 1];
        assert!(matches!(decode_input(&data), Err(InputError::TooLarge(_))));
    }

    #[test]
    fn decode_garbage_is_error() {
        assert!(decode_input(&[0xc1, 0xff, 0x00]).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..128)) {
                let _ = decode_input(&data);
            }
        }
    }
}
