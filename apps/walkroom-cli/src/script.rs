use walkroom_locomotion::{Intent, MoveDirection};

/// Longest a single step may be held.
pub const MAX_REPEAT: usize = 100_000;
/// Longest a whole script may expand to.
pub const MAX_FRAMES: usize = 1_000_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown key '{key}' in step {step}")]
    UnknownKey { step: usize, key: char },
    #[error("bad repeat count '{count}' in step {step}")]
    BadRepeat { step: usize, count: String },
    #[error("repeat count {count} in step {step} exceeds {max}", max = MAX_REPEAT)]
    RepeatTooLong { step: usize, count: usize },
    #[error("script expands to more than {max} frames", max = MAX_FRAMES)]
    TooLong,
}

/// Parse a key script into one intent per frame.
///
/// Steps are comma separated. Each step lists the held keys (`w`, `a`, `s`,
/// `d`, any order, any case) and may end in `*N` to hold them for N frames.
/// An empty step is a frame with no keys held: `w*30,,*10` walks forward
/// for 30 frames, then coasts for 11.
pub fn parse(script: &str) -> Result<Vec<Intent>, ScriptError> {
    let mut frames = Vec::new();
    for (step, token) in script.split(',').enumerate() {
        let token = token.trim();
        let (keys, repeat) = match token.split_once('*') {
            Some((keys, count)) => {
                let repeat = count.trim().parse::<usize>().map_err(|_| ScriptError::BadRepeat {
                    step,
                    count: count.to_string(),
                })?;
                if repeat > MAX_REPEAT {
                    return Err(ScriptError::RepeatTooLong { step, count: repeat });
                }
                (keys, repeat)
            }
            None => (token, 1),
        };

        let mut intent = Intent::new();
        for key in keys.chars().filter(|c| !c.is_whitespace()) {
            let direction = match key.to_ascii_lowercase() {
                'w' => MoveDirection::Forward,
                's' => MoveDirection::Backward,
                'a' => MoveDirection::Left,
                'd' => MoveDirection::Right,
                _ => return Err(ScriptError::UnknownKey { step, key }),
            };
            intent.set(direction, true);
        }
        if frames.len() + repeat > MAX_FRAMES {
            return Err(ScriptError::TooLong);
        }
        frames.extend(std::iter::repeat_n(intent, repeat));
    }
    Ok(frames)
}
