//! Routing of world events and system cues onto the audio backend.

use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
};

use anyhow::Result as AnyResult;
use log::debug;
use outbreak_core::{
    Cue, Event, GameState, Heading, MonsterId, MonsterKind, MonsterView, PlayerSnapshot,
    WorldPosition, MONSTER_AUDIO_HEIGHT,
};

use crate::{
    collaborators::{AudioBackend, PlaybackMode, SoundHandle},
    DriverError,
};

const SHOT_POOL: usize = 11;
const HIT_POOL: usize = 15;

/// Location of the sound files on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioAssets {
    root: PathBuf,
}

impl AudioAssets {
    /// Uses the sound files found under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }
}

impl Default for AudioAssets {
    fn default() -> Self {
        Self::new("wav")
    }
}

/// Drives every sound of the game from world state, events, and cues.
#[derive(Debug)]
pub struct AudioRouter {
    ambience: SoundHandle,
    title: SoundHandle,
    walk: SoundHandle,
    run: SoundHandle,
    game_over: SoundHandle,
    victory: SoundHandle,
    collect: SoundHandle,
    cough: SoundHandle,
    shots: Vec<SoundHandle>,
    next_shot: usize,
    hits: Vec<SoundHandle>,
    next_hit: usize,
    vocals: Vec<SoundHandle>,
}

impl AudioRouter {
    /// Loads every sound the game uses.
    pub fn load<A>(backend: &mut A, assets: &AudioAssets) -> Result<Self, DriverError>
    where
        A: AudioBackend + ?Sized,
    {
        let mut load = |file: &str, mode: PlaybackMode| {
            let path = assets.path(file);
            backend
                .load(&path, mode)
                .map_err(|error| DriverError::AudioAsset {
                    path,
                    reason: format!("{error:#}"),
                })
        };

        let ambience = load("ambience.wav", PlaybackMode::Flat)?;
        let title = load("title.wav", PlaybackMode::Flat)?;
        let walk = load("walk.wav", PlaybackMode::Flat)?;
        let run = load("run.wav", PlaybackMode::Flat)?;
        let game_over = load("gameover.wav", PlaybackMode::Flat)?;
        let victory = load("win.wav", PlaybackMode::Flat)?;
        let collect = load("collect.wav", PlaybackMode::Flat)?;
        let cough = load("cough.wav", PlaybackMode::Flat)?;
        let shots = (0..SHOT_POOL)
            .map(|_| load("shoot.wav", PlaybackMode::Flat))
            .collect::<Result<Vec<_>, _>>()?;
        let hits = (0..HIT_POOL)
            .map(|_| load("gun_hit.wav", PlaybackMode::Flat))
            .collect::<Result<Vec<_>, _>>()?;
        let vocals = MonsterId::all()
            .map(|monster| load(vocal_file(monster.kind()), PlaybackMode::Positional))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ambience,
            title,
            walk,
            run,
            game_over,
            victory,
            collect,
            cough,
            shots,
            next_shot: 0,
            hits,
            next_hit: 0,
            vocals,
        })
    }

    /// Applies one tick of audio side effects.
    #[allow(clippy::too_many_arguments)]
    pub fn update<A>(
        &mut self,
        backend: &mut A,
        state: GameState,
        player: &PlayerSnapshot,
        monsters: &MonsterView,
        events: &[Event],
        cues: &[Cue],
    ) where
        A: AudioBackend + ?Sized,
    {
        self.update_music(backend, state);

        for event in events {
            self.route_event(backend, event);
        }
        for cue in cues {
            self.route_cue(backend, *cue);
        }

        if state.is_playing() {
            self.update_footsteps(backend, player);
        }

        for monster in monsters.iter() {
            if let Some(sound) = self.vocals.get(monster.id.index()) {
                backend.set_position(*sound, monster.position.at_height(MONSTER_AUDIO_HEIGHT));
            }
        }
        backend.set_listener(player.position, player.heading);
    }

    fn update_music<A>(&self, backend: &mut A, state: GameState)
    where
        A: AudioBackend + ?Sized,
    {
        if state == GameState::Title {
            if !backend.is_playing(self.title) {
                backend.play(self.title, true);
            }
        } else if backend.is_playing(self.title) {
            backend.stop(self.title);
        }

        if state.is_playing() && !backend.is_playing(self.ambience) {
            backend.play(self.ambience, true);
        }
    }

    fn update_footsteps<A>(&self, backend: &mut A, player: &PlayerSnapshot)
    where
        A: AudioBackend + ?Sized,
    {
        let (wanted, unwanted) = match (player.movement.is_idle(), player.running) {
            (true, _) => {
                stop_if_playing(backend, self.walk);
                stop_if_playing(backend, self.run);
                return;
            }
            (false, false) => (self.walk, self.run),
            (false, true) => (self.run, self.walk),
        };
        stop_if_playing(backend, unwanted);
        if !backend.is_playing(wanted) {
            backend.play(wanted, true);
        }
    }

    fn route_event<A>(&mut self, backend: &mut A, event: &Event)
    where
        A: AudioBackend + ?Sized,
    {
        match event {
            Event::GameStateChanged { to, .. } if to.is_terminal() => {
                stop_if_playing(backend, self.ambience);
                stop_if_playing(backend, self.walk);
                stop_if_playing(backend, self.run);
                let sting = if *to == GameState::Victory {
                    self.victory
                } else {
                    self.game_over
                };
                backend.play(sting, false);
            }
            Event::MonsterHit { .. } => {
                let sound = self.hits[self.next_hit];
                self.next_hit = (self.next_hit + 1) % self.hits.len();
                backend.play(sound, false);
            }
            Event::FirstAidCollected { .. } => backend.play(self.collect, false),
            _ => {}
        }
    }

    fn route_cue<A>(&mut self, backend: &mut A, cue: Cue)
    where
        A: AudioBackend + ?Sized,
    {
        match cue {
            Cue::ShotFired => {
                let sound = self.shots[self.next_shot];
                self.next_shot = (self.next_shot + 1) % self.shots.len();
                backend.play(sound, false);
            }
            Cue::Distress => {
                if !backend.is_playing(self.cough) {
                    backend.play(self.cough, false);
                }
            }
            Cue::MonsterVocalized { monster } => {
                if let Some(sound) = self.vocals.get(monster.index()) {
                    if !backend.is_playing(*sound) {
                        backend.play(*sound, false);
                    }
                }
            }
        }
    }
}

fn vocal_file(kind: MonsterKind) -> &'static str {
    match kind {
        MonsterKind::Shambler | MonsterKind::Stalker => "zombie1.wav",
        MonsterKind::Crawler => "zombie2.wav",
    }
}

fn stop_if_playing<A>(backend: &mut A, sound: SoundHandle)
where
    A: AudioBackend + ?Sized,
{
    if backend.is_playing(sound) {
        backend.stop(sound);
    }
}

/// Audio backend that produces no sound and keeps a log of playback requests.
///
/// Looped sounds stay "playing" until stopped; one-shots finish immediately.
#[derive(Debug, Default)]
pub struct SilentAudio {
    paths: HashMap<SoundHandle, PathBuf>,
    looping: BTreeSet<SoundHandle>,
    played: Vec<SoundHandle>,
    listener: Option<(WorldPosition, Heading)>,
}

impl SilentAudio {
    /// Creates a backend with no loaded sounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File names of every sound played so far, in order.
    #[must_use]
    pub fn played_files(&self) -> Vec<String> {
        self.played
            .iter()
            .filter_map(|sound| self.paths.get(sound))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }

    /// Handles of every sound played so far, in order.
    #[must_use]
    pub fn played(&self) -> &[SoundHandle] {
        &self.played
    }

    /// Last listener pose reported.
    #[must_use]
    pub fn listener(&self) -> Option<(WorldPosition, Heading)> {
        self.listener
    }
}

impl AudioBackend for SilentAudio {
    fn load(&mut self, path: &Path, mode: PlaybackMode) -> AnyResult<SoundHandle> {
        let raw = u32::try_from(self.paths.len())?;
        let handle = SoundHandle::new(raw);
        let _ = self.paths.insert(handle, path.to_path_buf());
        debug!("registered {} as {mode:?} sound {raw}", path.display());
        Ok(handle)
    }

    fn play(&mut self, sound: SoundHandle, looped: bool) {
        self.played.push(sound);
        if looped {
            let _ = self.looping.insert(sound);
        }
    }

    fn stop(&mut self, sound: SoundHandle) {
        let _ = self.looping.remove(&sound);
    }

    fn is_playing(&self, sound: SoundHandle) -> bool {
        self.looping.contains(&sound)
    }

    fn set_position(&mut self, _sound: SoundHandle, _position: WorldPosition) {}

    fn set_listener(&mut self, position: WorldPosition, heading: Heading) {
        self.listener = Some((position, heading));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbreak_core::{Movement, MAX_HEALTH};

    fn player(movement: Movement, running: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            position: WorldPosition::new(0.0, 6.0, -20.0),
            heading: Heading::FORWARD,
            movement,
            running,
            health: MAX_HEALTH,
        }
    }

    fn router(audio: &mut SilentAudio) -> AudioRouter {
        AudioRouter::load(audio, &AudioAssets::default()).expect("silent audio always loads")
    }

    #[test]
    fn shot_pool_rotates_through_eleven_sounds() {
        let mut audio = SilentAudio::new();
        let mut router = router(&mut audio);
        let cues = vec![Cue::ShotFired; SHOT_POOL + 1];

        router.update(
            &mut audio,
            GameState::Playing,
            &player(Movement::IDLE, false),
            &MonsterView::default(),
            &[],
            &cues,
        );

        let shots: Vec<SoundHandle> = audio
            .played()
            .iter()
            .copied()
            .filter(|sound| router.shots.contains(sound))
            .collect();
        assert_eq!(shots.len(), SHOT_POOL + 1);
        assert_eq!(shots[0], shots[SHOT_POOL]);
        assert_ne!(shots[0], shots[1]);
    }

    #[test]
    fn running_swaps_walk_loop_for_run_loop() {
        let mut audio = SilentAudio::new();
        let mut router = router(&mut audio);

        router.update(
            &mut audio,
            GameState::Playing,
            &player(Movement::FORWARD, false),
            &MonsterView::default(),
            &[],
            &[],
        );
        assert!(audio.is_playing(router.walk));

        router.update(
            &mut audio,
            GameState::Playing,
            &player(Movement::FORWARD, true),
            &MonsterView::default(),
            &[],
            &[],
        );
        assert!(audio.is_playing(router.run));
        assert!(!audio.is_playing(router.walk));
    }

    #[test]
    fn terminal_state_stops_loops_and_plays_sting_once() {
        let mut audio = SilentAudio::new();
        let mut router = router(&mut audio);
        router.update(
            &mut audio,
            GameState::Playing,
            &player(Movement::BACK, false),
            &MonsterView::default(),
            &[],
            &[],
        );

        let events = [Event::GameStateChanged {
            from: GameState::Playing,
            to: GameState::Victory,
        }];
        router.update(
            &mut audio,
            GameState::Victory,
            &player(Movement::BACK, false),
            &MonsterView::default(),
            &events,
            &[],
        );
        router.update(
            &mut audio,
            GameState::Victory,
            &player(Movement::BACK, false),
            &MonsterView::default(),
            &[],
            &[],
        );

        assert!(!audio.is_playing(router.ambience));
        assert!(!audio.is_playing(router.walk));
        let wins = audio
            .played_files()
            .iter()
            .filter(|file| file.as_str() == "win.wav")
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn title_music_stops_when_play_begins() {
        let mut audio = SilentAudio::new();
        let mut router = router(&mut audio);
        let idle = player(Movement::IDLE, false);

        router.update(&mut audio, GameState::Title, &idle, &MonsterView::default(), &[], &[]);
        assert!(audio.is_playing(router.title));

        router.update(&mut audio, GameState::Playing, &idle, &MonsterView::default(), &[], &[]);
        assert!(!audio.is_playing(router.title));
        assert!(audio.is_playing(router.ambience));
        assert_eq!(audio.listener(), Some((idle.position, idle.heading)));
    }
}
