//! Per-level conversations
//!
//! A level's dialog file is a list of blocks, one per speech point:
//!
//! ```text
//! # 2
//! 0|2500|Where am I?
//! 3|3000|Keep your voice down.
//! ```
//!
//! Each line is `speaker id|duration in ms|text`. Speaker 0 is the player,
//! any other id is the NPC placed with that id. Blank lines are ignored.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use crate::sim::components::{Speech, SpeechLine};
use crate::sim::map::{DataError, LevelData};
use crate::sim::{Entity, Registry};

#[derive(Debug, Error)]
pub enum DialogError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("dialog line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogLine {
    pub speaker: u32,
    pub duration_ms: f32,
    pub text: String,
}

pub type DialogData = HashMap<u32, Vec<DialogLine>>;

/// Parse a dialog file into lines grouped by speech point index
pub fn parse_dialog(source: &str) -> Result<DialogData, DialogError> {
    let mut data = DialogData::new();
    let mut current: Option<u32> = None;

    for (n, raw) in source.lines().enumerate() {
        let line = n + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(header) = text.strip_prefix('#') {
            let index = header
                .trim()
                .parse()
                .map_err(|_| DialogError::Malformed {
                    line,
                    reason: "speech point index is not a number",
                })?;
            data.entry(index).or_default();
            current = Some(index);
            continue;
        }

        let index = current.ok_or(DialogError::Malformed {
            line,
            reason: "line before any `# <index>` header",
        })?;
        let mut fields = text.splitn(3, '|');
        let (Some(speaker), Some(duration), Some(words)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(DialogError::Malformed {
                line,
                reason: "expected `speaker|duration|text`",
            });
        };
        let speaker = speaker.trim().parse().map_err(|_| DialogError::Malformed {
            line,
            reason: "speaker id is not a number",
        })?;
        let duration_ms = duration
            .trim()
            .parse()
            .map_err(|_| DialogError::Malformed {
                line,
                reason: "duration is not a number",
            })?;
        data.entry(index).or_default().push(DialogLine {
            speaker,
            duration_ms,
            text: words.trim().to_string(),
        });
    }
    Ok(data)
}

/// Dialog for the current level and the conversation being played
#[derive(Debug, Default)]
pub struct DialogSystem {
    data: DialogData,
    speech_entity: Option<Entity>,
}

impl DialogSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `level`'s dialog, dropping any conversation still on screen.
    /// Bad or missing files leave the level without dialog.
    pub fn initialize(&mut self, registry: &mut Registry, data: &dyn LevelData, level: u32) {
        self.clear(registry);
        let parsed = data
            .dialog_source(level)
            .map_err(DialogError::from)
            .and_then(|source| parse_dialog(&source));
        match parsed {
            Ok(dialog) => {
                log::info!("Loaded {} speech points for level {level}", dialog.len());
                self.data = dialog;
            }
            Err(e) => log::warn!("No dialog for level {level}: {e}"),
        }
    }

    /// Text of one line, or empty when it does not exist
    pub fn text(&self, index: u32, line: usize) -> &str {
        self.data
            .get(&index)
            .and_then(|lines| lines.get(line))
            .map_or("", |l| l.text.as_str())
    }

    pub fn lines(&self, index: u32) -> &[DialogLine] {
        self.data.get(&index).map_or(&[], Vec::as_slice)
    }

    /// Entity currently carrying the conversation, if one is playing
    pub fn speech_entity(&self) -> Option<Entity> {
        self.speech_entity
    }

    /// Start playing the conversation for `index`, replacing any other
    pub fn create_speech_point(&mut self, registry: &mut Registry, index: u32) {
        self.stop(registry);

        let mut lines = VecDeque::new();
        for line in self.lines(index) {
            if find_speaker(registry, line.speaker).is_none() {
                log::warn!("speech point {index}: no speaker with id {}", line.speaker);
                continue;
            }
            lines.push_back(SpeechLine {
                speaker: line.speaker,
                text: line.text.clone(),
                duration_ms: line.duration_ms,
            });
        }
        let Some(first) = lines.front() else {
            log::warn!("speech point {index} has nothing to say");
            return;
        };

        let entity = registry.create_entity();
        let counter_ms = first.duration_ms;
        registry.speech.insert(entity, Speech { lines, counter_ms });
        self.speech_entity = Some(entity);
    }

    /// Drop the level's dialog and whatever conversation is playing
    pub fn clear(&mut self, registry: &mut Registry) {
        self.stop(registry);
        self.data.clear();
    }

    fn stop(&mut self, registry: &mut Registry) {
        if let Some(entity) = self.speech_entity.take() {
            registry.remove_all_components_of(entity);
        }
    }
}

/// Id 0 is the player; anything else names an NPC
pub fn find_speaker(registry: &Registry, id: u32) -> Option<Entity> {
    if id == 0 {
        return registry.players.entities().first().copied();
    }
    registry
        .npcs
        .iter()
        .find(|(_, npc)| npc.id == id)
        .map(|(entity, _)| entity)
}

/// Line on screen for the conversation carried by `speech`, with the entity
/// it is drawn above. A speaker that is not on screen (a hidden player) gives
/// `None` for the entity while the line keeps playing.
pub fn current_line(registry: &Registry, speech: Entity) -> Option<(Option<Entity>, &str)> {
    let line = registry.speech.get(speech)?.lines.front()?;
    Some((find_speaker(registry, line.speaker), line.text.as_str()))
}

/// Count down the head line of every conversation. Lines only advance when
/// `advance` is set; the tutorial keeps its line up until it moves on.
pub fn update_speech(registry: &mut Registry, dt_ms: f32, advance: bool) {
    let mut finished = Vec::new();
    for (entity, speech) in registry.speech.iter_mut() {
        speech.counter_ms -= dt_ms;
        if speech.counter_ms >= 0.0 || !advance {
            continue;
        }
        speech.lines.pop_front();
        match speech.lines.front() {
            Some(next) => speech.counter_ms = next.duration_ms,
            None => finished.push(entity),
        }
    }
    for entity in finished {
        registry.speech.remove(entity);
    }
}
