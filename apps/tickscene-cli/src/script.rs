//! Scripted input for headless runs.
//!
//! A script is a comma separated list of `frame:action[:arg]` steps:
//! `10:down:KeyW,40:up:KeyW,50:down:Space,60:overlay-pause,90:resize:1280x720`.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptAction {
    KeyDown(String),
    KeyUp(String),
    /// Toggle the pause checkbox on the debug overlay.
    OverlayPause,
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("step `{0}`: expected frame:action[:arg]")]
    Malformed(String),
    #[error("step `{step}`: bad frame number")]
    BadFrame { step: String },
    #[error("step `{step}`: unknown action `{action}`")]
    UnknownAction { step: String, action: String },
    #[error("step `{step}`: missing argument")]
    MissingArgument { step: String },
    #[error("step `{step}`: bad size, expected WIDTHxHEIGHT")]
    BadSize { step: String },
}

/// Steps keyed by the frame they fire before, in script order within a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: BTreeMap<u64, Vec<ScriptAction>>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut script = Self::default();
        for step in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let mut parts = step.splitn(3, ':');
            let (Some(frame), Some(action)) = (parts.next(), parts.next()) else {
                return Err(ScriptError::Malformed(step.to_string()));
            };
            let frame: u64 = frame.trim().parse().map_err(|_| ScriptError::BadFrame {
                step: step.to_string(),
            })?;
            let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());
            let missing = || ScriptError::MissingArgument {
                step: step.to_string(),
            };

            let action = match action.trim() {
                "down" => ScriptAction::KeyDown(arg.ok_or_else(missing)?.to_string()),
                "up" => ScriptAction::KeyUp(arg.ok_or_else(missing)?.to_string()),
                "overlay-pause" => ScriptAction::OverlayPause,
                "resize" => {
                    let size = arg.ok_or_else(missing)?;
                    let bad = || ScriptError::BadSize {
                        step: step.to_string(),
                    };
                    let (w, h) = size.split_once('x').ok_or_else(bad)?;
                    ScriptAction::Resize {
                        width: w.parse().map_err(|_| bad())?,
                        height: h.parse().map_err(|_| bad())?,
                    }
                }
                other => {
                    return Err(ScriptError::UnknownAction {
                        step: step.to_string(),
                        action: other.to_string(),
                    });
                }
            };
            script.steps.entry(frame).or_default().push(action);
        }
        Ok(script)
    }

    /// Actions to apply before frame `frame` (1-based).
    pub fn at(&self, frame: u64) -> &[ScriptAction] {
        self.steps.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.steps.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_in_order() {
        let script = Script::parse("10:down:KeyW, 40:up:KeyW,10:down:Space,60:overlay-pause").unwrap();
        assert_eq!(script.len(), 4);
        assert_eq!(
            script.at(10),
            &[
                ScriptAction::KeyDown("KeyW".into()),
                ScriptAction::KeyDown("Space".into())
            ]
        );
        assert_eq!(script.at(40), &[ScriptAction::KeyUp("KeyW".into())]);
        assert_eq!(script.at(60), &[ScriptAction::OverlayPause]);
        assert!(script.at(11).is_empty());
    }

    #[test]
    fn parses_resize() {
        let script = Script::parse("5:resize:1280x720").unwrap();
        assert_eq!(
            script.at(5),
            &[ScriptAction::Resize {
                width: 1280,
                height: 720
            }]
        );
    }

    #[test]
    fn empty_script() {
        assert!(Script::parse("").unwrap().is_empty());
        assert!(Script::parse(" , ").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_steps() {
        assert_eq!(
            Script::parse("KeyW"),
            Err(ScriptError::Malformed("KeyW".into()))
        );
        assert!(matches!(
            Script::parse("x:down:KeyW"),
            Err(ScriptError::BadFrame { .. })
        ));
        assert!(matches!(
            Script::parse("1:jump"),
            Err(ScriptError::UnknownAction { action, .. }) if action == "jump"
        ));
        assert!(matches!(
            Script::parse("1:down"),
            Err(ScriptError::MissingArgument { .. })
        ));
        assert!(matches!(
            Script::parse("1:resize:big"),
            Err(ScriptError::BadSize { .. })
        ));
    }
}
