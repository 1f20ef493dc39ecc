//! Scripted player input for headless runs.
//!
//! A script is a list of actions played back in order. Timed actions hold
//! for a duration; button presses produce a single-frame edge.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

use glade_common::Vec2;
use glade_gameplay::InputFrame;

/// A button on the virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    /// Swing the weapon
    Attack,
    /// Talk to whatever is in reach
    Interact,
    /// Next dialogue line
    Advance,
    /// Close dialogue
    Skip,
    /// Pause or resume
    Pause,
}

/// A single scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Do nothing for a while
    Wait {
        /// Duration in seconds
        seconds: f32,
    },

    /// Hold a movement direction
    Move {
        /// Horizontal axis (-1 = left, 1 = right)
        x: f32,
        /// Vertical axis (-1 = down, 1 = up)
        y: f32,
        /// Duration in seconds
        seconds: f32,
    },

    /// Press a button for one frame
    Press {
        /// Button pressed
        button: Button,
    },

    /// Log a message
    Log {
        /// Message to log
        message: String,
    },

    /// Repeat a set of actions
    Repeat {
        /// Number of times to repeat
        count: u32,
        /// Actions to repeat
        actions: Vec<ScriptAction>,
    },
}

/// An input script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputScript {
    /// Actions in playback order
    pub steps: Vec<ScriptAction>,
}

impl InputScript {
    /// Walk of the village level: talk to the elder, fight the slime, reach
    /// the objective marker and leave for the forest.
    #[must_use]
    pub fn demo() -> Self {
        use ScriptAction::{Log, Move, Press, Repeat, Wait};

        let advance = vec![
            Wait { seconds: 1.5 },
            Press {
                button: Button::Advance,
            },
        ];
        let swing = vec![
            Press {
                button: Button::Attack,
            },
            Wait { seconds: 0.4 },
        ];

        Self {
            steps: vec![
                Log {
                    message: "Walking to the elder".to_string(),
                },
                Move {
                    x: 0.0,
                    y: 1.0,
                    seconds: 0.2,
                },
                Wait { seconds: 0.1 },
                Press {
                    button: Button::Interact,
                },
                Repeat {
                    count: 3,
                    actions: advance,
                },
                Move {
                    x: 0.0,
                    y: -1.0,
                    seconds: 0.2,
                },
                Log {
                    message: "Heading east".to_string(),
                },
                Move {
                    x: 1.0,
                    y: 0.0,
                    seconds: 0.8,
                },
                Repeat {
                    count: 6,
                    actions: swing,
                },
                Move {
                    x: 1.0,
                    y: 0.0,
                    seconds: 1.8,
                },
            ],
        }
    }
}

/// Plays an [`InputScript`] back one frame at a time.
#[derive(Debug, Clone)]
pub struct ScriptPlayer {
    queue: VecDeque<ScriptAction>,
    elapsed: f32,
}

impl ScriptPlayer {
    /// Queue a script for playback.
    #[must_use]
    pub fn new(script: &InputScript) -> Self {
        Self {
            queue: script.steps.iter().cloned().collect(),
            elapsed: 0.0,
        }
    }

    /// Whether every action has played.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued actions (repeats count once until expanded).
    #[must_use]
    pub fn pending_action_count(&self) -> usize {
        self.queue.len()
    }

    /// Input for the next frame of `dt` seconds.
    pub fn next_frame(&mut self, dt: f32) -> InputFrame {
        loop {
            let Some(action) = self.queue.front() else {
                return InputFrame::new();
            };

            let (frame, seconds) = match action {
                ScriptAction::Wait { seconds } => (InputFrame::new(), *seconds),
                ScriptAction::Move { x, y, seconds } => (InputFrame::new().with_movement(Vec2::new(*x, *y)), *seconds),
                ScriptAction::Press { button } => {
                    let frame = press(*button);
                    debug!(?button, "Scripted press");
                    self.queue.pop_front();
                    return frame;
                },
                ScriptAction::Log { message } => {
                    info!("{message}");
                    self.queue.pop_front();
                    continue;
                },
                ScriptAction::Repeat { .. } => {
                    self.expand_repeat();
                    continue;
                },
            };

            if seconds <= 0.0 {
                self.queue.pop_front();
                continue;
            }

            self.elapsed += dt;
            if self.elapsed >= seconds - 1e-4 {
                self.queue.pop_front();
                self.elapsed = 0.0;
            }
            return frame;
        }
    }

    fn expand_repeat(&mut self) {
        let Some(ScriptAction::Repeat { count, actions }) = self.queue.pop_front() else {
            return;
        };
        for _ in 0..count {
            for action in actions.iter().rev() {
                self.queue.push_front(action.clone());
            }
        }
    }
}

fn press(button: Button) -> InputFrame {
    let frame = InputFrame::new();
    match button {
        Button::Attack => frame.with_attack(),
        Button::Interact => frame.with_interact(),
        Button::Advance => frame.with_advance(),
        Button::Skip => frame.with_skip(),
        Button::Pause => frame.with_pause(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    #[test]
    fn test_move_holds_for_duration() {
        let script = InputScript {
            steps: vec![ScriptAction::Move {
                x: 1.0,
                y: 0.0,
                seconds: 0.3,
            }],
        };
        let mut player = ScriptPlayer::new(&script);

        for _ in 0..3 {
            assert_eq!(player.next_frame(DT).movement, Vec2::X);
        }
        assert!(player.is_idle());
        assert_eq!(player.next_frame(DT), InputFrame::new());
    }

    #[test]
    fn test_press_is_a_single_edge() {
        let script = InputScript {
            steps: vec![
                ScriptAction::Press {
                    button: Button::Attack,
                },
                ScriptAction::Press {
                    button: Button::Attack,
                },
            ],
        };
        let mut player = ScriptPlayer::new(&script);

        assert!(player.next_frame(DT).attack);
        assert!(player.next_frame(DT).attack);
        assert!(!player.next_frame(DT).attack);
    }

    #[test]
    fn test_log_and_zero_waits_take_no_frame() {
        let script = InputScript {
            steps: vec![
                ScriptAction::Log {
                    message: "hello".to_string(),
                },
                ScriptAction::Wait { seconds: 0.0 },
                ScriptAction::Press {
                    button: Button::Interact,
                },
            ],
        };
        let mut player = ScriptPlayer::new(&script);
        assert!(player.next_frame(DT).interact);
        assert!(player.is_idle());
    }

    #[test]
    fn test_repeat_expands_in_order() {
        let script = InputScript {
            steps: vec![ScriptAction::Repeat {
                count: 2,
                actions: vec![
                    ScriptAction::Press {
                        button: Button::Advance,
                    },
                    ScriptAction::Wait { seconds: DT },
                ],
            }],
        };
        let mut player = ScriptPlayer::new(&script);

        let frames: Vec<bool> = (0..5).map(|_| player.next_frame(DT).advance).collect();
        assert_eq!(frames, vec![true, false, true, false, false]);
    }

    #[test]
    fn test_demo_script_from_toml() {
        let source = r#"
            [[steps]]
            type = "move"
            x = 0.0
            y = 1.0
            seconds = 0.5

            [[steps]]
            type = "press"
            button = "interact"

            [[steps]]
            type = "repeat"
            count = 2

            [[steps.actions]]
            type = "wait"
            seconds = 1.0
        "#;
        let script: InputScript = toml::from_str(source).expect("valid script");
        assert_eq!(script.steps.len(), 3);
        assert_eq!(
            script.steps[1],
            ScriptAction::Press {
                button: Button::Interact
            }
        );

        let demo = InputScript::demo();
        let text = toml::to_string_pretty(&demo).expect("serializable");
        let back: InputScript = toml::from_str(&text).expect("round trip");
        assert_eq!(back, demo);
    }
}
