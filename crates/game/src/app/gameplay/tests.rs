use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use engine::{
    AssetError, AssetLoader, Audio, Camera, Graphics, Image, InputEvent, InputKind, Rect,
    Simulation, Sound, Vec2i,
};

use super::*;

const ACTOR_SIZE: (i32, i32) = (20, 30);
const GROUND_TOP: i32 = 80;
const STANDING_Y: i32 = GROUND_TOP - ACTOR_SIZE.1;

struct FakeAssets {
    images: HashMap<String, Image>,
    sounds: HashMap<String, Sound>,
    rectangles: HashMap<String, Rect>,
}

impl FakeAssets {
    fn new() -> Self {
        let rectangles = [
            ("ground", Rect::new(-1_000, GROUND_TOP, 4_000, 40)),
            ("ledge_low", Rect::new(2_000, 40, 100, 10)),
            ("ledge_mid", Rect::new(2_200, 0, 100, 10)),
            ("ledge_high", Rect::new(2_400, -40, 100, 10)),
            ("hero_start", Rect::new(100, STANDING_Y, 1, 1)),
            ("barney_start", Rect::new(300, STANDING_Y, 1, 1)),
        ]
        .into_iter()
        .map(|(id, rect)| (id.to_string(), rect))
        .collect();
        let sounds = [
            ("jump", Sound::new(0, Duration::from_millis(250))),
            ("music", Sound::new(1, Duration::from_secs(90))),
        ]
        .into_iter()
        .map(|(id, sound)| (id.to_string(), sound))
        .collect();
        Self {
            images: HashMap::new(),
            sounds,
            rectangles,
        }
    }

    fn without_sound(mut self, id: &str) -> Self {
        self.sounds.remove(id);
        self
    }

    fn without_rectangle(mut self, id: &str) -> Self {
        self.rectangles.remove(id);
        self
    }
}

impl AssetLoader for FakeAssets {
    fn load_image(&mut self, id: &str) -> Result<Image, AssetError> {
        if let Some(image) = self.images.get(id) {
            return Ok(*image);
        }
        if !(id.starts_with("gophette_") || id.starts_with("barney_")) {
            return Err(AssetError::UnknownImage(id.to_string()));
        }
        let index = self.images.len() as i32;
        let image = Image::new(
            index as u32,
            Rect::new(index * ACTOR_SIZE.0, 0, ACTOR_SIZE.0, ACTOR_SIZE.1),
        );
        self.images.insert(id.to_string(), image);
        Ok(image)
    }

    fn load_sound(&mut self, id: &str) -> Result<Sound, AssetError> {
        self.sounds
            .get(id)
            .copied()
            .ok_or_else(|| AssetError::UnknownSound(id.to_string()))
    }

    fn load_rectangle(&mut self, id: &str) -> Result<Rect, AssetError> {
        self.rectangles
            .get(id)
            .copied()
            .ok_or_else(|| AssetError::UnknownRectangle(id.to_string()))
    }
}

#[derive(Clone, Default)]
struct CountingAudio {
    played: Rc<Cell<usize>>,
    music_starts: Rc<Cell<usize>>,
    last_fade_in: Rc<Cell<Duration>>,
}

impl Audio for CountingAudio {
    fn play_once(&mut self, _sound: Sound) {
        self.played.set(self.played.get() + 1);
    }

    fn play_music(&mut self, _sound: Sound, fade_in: Duration) {
        self.music_starts.set(self.music_starts.get() + 1);
        self.last_fade_in.set(fade_in);
    }
}

#[derive(Default)]
struct RecordingGraphics {
    clears: Vec<(u8, u8, u8)>,
    draws: Vec<(Image, i32, i32)>,
    fills: Vec<Rect>,
}

impl Graphics for RecordingGraphics {
    fn clear_screen(&mut self, r: u8, g: u8, b: u8) {
        self.clears.push((r, g, b));
    }

    fn draw_image(&mut self, image: Image, x: i32, y: i32) {
        self.draws.push((image, x, y));
    }

    fn fill_rect(&mut self, rect: Rect, _color: [u8; 3]) {
        self.fills.push(rect);
    }
}

fn sprites() -> ActorSprites {
    ActorSprites::load(&mut FakeAssets::new(), "gophette", "jump").expect("sprites")
}

fn ground_level() -> Level {
    Level::new(vec![Rect::new(-10_000, GROUND_TOP, 20_000, 40)])
}

fn actor_at(x: i32) -> Actor {
    Actor::new(
        "test",
        Vec2i::new(x, STANDING_Y),
        sprites(),
        ActorTuning::default(),
    )
}

fn run_ticks(actor: &mut Actor, level: &Level, ticks: usize) {
    let mut audio = CountingAudio::default();
    for _ in 0..ticks {
        actor.update(level, &mut audio);
    }
}

fn game() -> Game {
    game_with_recorder(InputRecorder::new())
}

fn game_with_recorder(recorder: InputRecorder) -> Game {
    Game::load(
        &mut FakeAssets::new(),
        Box::new(CountingAudio::default()),
        recorder,
        (800, 600),
    )
    .expect("game")
}

#[test]
fn go_left_scenario_accelerates_and_integrates_position() {
    let mut actor = Actor::new(
        "test",
        Vec2i::new(100, 50),
        sprites(),
        ActorTuning::default(),
    );
    assert_eq!(actor.direction(), Direction::Right);
    let level = ground_level();
    let mut audio = CountingAudio::default();

    actor.accelerate(Direction::Left);
    let mut speeds = Vec::new();
    let mut xs = Vec::new();
    for _ in 0..5 {
        actor.update(&level, &mut audio);
        assert_eq!(actor.direction(), Direction::Left);
        speeds.push(actor.speed().x);
        xs.push(actor.position().x);
    }

    assert_eq!(speeds, vec![-2, -4, -6, -8, -10]);
    assert_eq!(xs, vec![98, 94, 88, 80, 70]);
    assert_eq!(actor.position().y, 50);
    assert!(actor.grounded());
}

#[test]
fn leftward_speed_follows_clamped_ramp() {
    let tuning = ActorTuning::default();
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.accelerate(Direction::Left);

    let mut previous = actor.speed().x;
    for n in 1..=20 {
        run_ticks(&mut actor, &level, 1);
        let expected = (-tuning.acceleration_x * n).max(-tuning.max_speed_x);
        assert_eq!(actor.speed().x, expected, "tick={n}");
        assert!(actor.speed().x <= previous);
        previous = actor.speed().x;
    }
}

#[test]
fn releasing_without_opposition_decelerates_to_rest() {
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.accelerate(Direction::Right);
    run_ticks(&mut actor, &level, 10);
    assert_eq!(actor.speed().x, 10);

    actor.stop_accelerating(Direction::Right);
    let mut speeds = Vec::new();
    for _ in 0..12 {
        run_ticks(&mut actor, &level, 1);
        speeds.push(actor.speed().x);
    }

    assert_eq!(speeds, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 0, 0]);
    assert_eq!(actor.direction(), Direction::Right);
}

#[test]
fn stopping_resets_animation_and_it_stays_idle() {
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.accelerate(Direction::Right);
    run_ticks(&mut actor, &level, 7);
    assert_ne!(actor.animation(), AnimationState::default());

    actor.stop_accelerating(Direction::Right);
    actor.set_speed_x(1);
    run_ticks(&mut actor, &level, 1);
    assert_eq!(actor.speed().x, 0);
    for _ in 0..10 {
        assert_eq!(actor.animation().frame_index, 0);
        assert_eq!(actor.animation().ticks_until_next_frame, 0);
        run_ticks(&mut actor, &level, 1);
    }
    assert_eq!(
        actor.current_frame(),
        sprites().run_frame(Direction::Right, 0)
    );
}

#[test]
fn run_cycle_advances_one_phase_every_frame_delay_ticks() {
    let tuning = ActorTuning::default();
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.accelerate(Direction::Right);

    let window = tuning.run_frame_delay as usize * 4;
    let mut frames = Vec::new();
    for _ in 0..window * 2 {
        run_ticks(&mut actor, &level, 1);
        frames.push(actor.animation().frame_index);
    }

    let phases: Vec<usize> = frames
        .chunks(tuning.run_frame_delay as usize)
        .map(|chunk| {
            assert!(chunk.iter().all(|frame| *frame == chunk[0]), "{chunk:?}");
            chunk[0]
        })
        .collect();
    assert_eq!(phases, vec![1, 2, 3, 0, 1, 2, 3, 0]);

    for window_frames in frames.chunks(window) {
        let mut visited: Vec<usize> = window_frames.to_vec();
        visited.sort_unstable();
        visited.dedup();
        assert_eq!(visited, vec![0, 1, 2, 3]);
    }
}

#[test]
fn visible_frames_follow_step_step_pattern() {
    let visible: Vec<usize> = (0..8).map(visible_run_frame).collect();
    assert_eq!(visible, vec![0, 1, 0, 2, 0, 1, 0, 2]);
}

#[test]
fn continuous_running_draws_frames_in_step_step_order() {
    let tuning = ActorTuning::default();
    let level = ground_level();
    let sprites = sprites();
    let mut actor = actor_at(0);
    run_ticks(&mut actor, &level, 1);
    actor.accelerate(Direction::Right);

    let delay = tuning.run_frame_delay as usize;
    let mut drawn = Vec::new();
    for _ in 0..2 * delay * 4 {
        run_ticks(&mut actor, &level, 1);
        let visible = (0..3)
            .find(|frame| actor.current_frame() == sprites.run_frame(Direction::Right, *frame))
            .expect("a run frame is drawn");
        drawn.push(visible);
    }

    let per_phase: Vec<usize> = drawn.chunks(delay).map(|chunk| chunk[0]).collect();
    assert!(drawn
        .chunks(delay)
        .all(|chunk| chunk.iter().all(|frame| *frame == chunk[0])));
    assert_eq!(per_phase, vec![1, 0, 2, 0, 1, 0, 2, 0]);
}

#[test]
fn moving_actor_draws_run_frame_for_current_phase() {
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.accelerate(Direction::Left);
    run_ticks(&mut actor, &level, 1);

    assert_eq!(actor.animation().frame_index, 1);
    assert_eq!(actor.current_frame(), sprites().run_frame(Direction::Left, 1));

    run_ticks(&mut actor, &level, 8);
    assert_eq!(actor.animation().frame_index, 3);
    assert_eq!(actor.current_frame(), sprites().run_frame(Direction::Left, 2));
}

#[test]
fn direction_is_kept_while_stopped() {
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.set_direction(Direction::Left);

    run_ticks(&mut actor, &level, 5);
    assert_eq!(actor.speed().x, 0);
    assert_eq!(actor.direction(), Direction::Left);

    actor.accelerate(Direction::Right);
    run_ticks(&mut actor, &level, 1);
    assert_eq!(actor.direction(), Direction::Right);
}

#[test]
fn direction_flips_only_when_speed_changes_sign() {
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.accelerate(Direction::Left);
    run_ticks(&mut actor, &level, 3);
    assert_eq!(actor.speed().x, -6);

    actor.accelerate(Direction::Right);
    run_ticks(&mut actor, &level, 2);
    assert_eq!(actor.speed().x, -2);
    assert_eq!(actor.direction(), Direction::Left);

    run_ticks(&mut actor, &level, 1);
    assert_eq!(actor.speed().x, 0);
    assert_eq!(actor.direction(), Direction::Left);

    run_ticks(&mut actor, &level, 1);
    assert_eq!(actor.speed().x, 2);
    assert_eq!(actor.direction(), Direction::Right);
}

#[test]
fn most_recent_press_wins_and_release_falls_back_to_held_key() {
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.accelerate(Direction::Left);
    actor.accelerate(Direction::Right);
    run_ticks(&mut actor, &level, 1);
    assert_eq!(actor.speed().x, 2);

    actor.stop_accelerating(Direction::Right);
    run_ticks(&mut actor, &level, 1);
    assert_eq!(actor.speed().x, 0);
    run_ticks(&mut actor, &level, 1);
    assert_eq!(actor.speed().x, -2);
}

#[test]
fn releasing_the_older_key_keeps_the_latest_intent() {
    let level = ground_level();
    let mut actor = actor_at(0);
    actor.accelerate(Direction::Left);
    actor.accelerate(Direction::Right);
    actor.stop_accelerating(Direction::Left);
    run_ticks(&mut actor, &level, 2);
    assert_eq!(actor.speed().x, 4);
}

#[test]
fn jump_leaves_ground_plays_sound_and_lands_again() {
    let level = ground_level();
    let mut actor = actor_at(0);
    let mut audio = CountingAudio::default();
    actor.update(&level, &mut audio);
    assert!(actor.grounded());
    assert_eq!(actor.position().y, STANDING_Y);

    actor.set_jump_requested(true);
    actor.update(&level, &mut audio);
    assert!(!actor.grounded());
    assert!(actor.speed().y < 0);
    assert!(actor.position().y < STANDING_Y);
    assert_eq!(audio.played.get(), 1);
    assert_eq!(actor.current_frame(), sprites().jump_frame(Direction::Right));

    actor.set_jump_requested(false);
    for _ in 0..60 {
        actor.update(&level, &mut audio);
    }
    assert!(actor.grounded());
    assert_eq!(actor.position().y, STANDING_Y);
    assert_eq!(actor.speed().y, 0);
    assert_eq!(audio.played.get(), 1);
}

#[test]
fn jump_request_is_ignored_until_grounded() {
    let level = ground_level();
    let mut actor = Actor::new(
        "test",
        Vec2i::new(0, STANDING_Y - 50),
        sprites(),
        ActorTuning::default(),
    );
    let mut audio = CountingAudio::default();
    actor.set_jump_requested(true);
    actor.update(&level, &mut audio);

    assert!(!actor.grounded());
    assert!(actor.speed().y > 0);
    assert_eq!(audio.played.get(), 0);
}

#[test]
fn fall_speed_is_capped() {
    let level = Level::default();
    let mut actor = actor_at(0);
    run_ticks(&mut actor, &level, 40);

    assert_eq!(actor.speed().y, ActorTuning::default().max_fall_speed_y);
    assert!(!actor.grounded());
}

#[test]
fn running_off_a_ledge_starts_a_fall() {
    let level = Level::new(vec![
        Rect::new(0, GROUND_TOP, 40, 10),
        Rect::new(-1_000, GROUND_TOP + 200, 3_000, 10),
    ]);
    let mut actor = actor_at(10);
    run_ticks(&mut actor, &level, 1);
    assert!(actor.grounded());

    actor.accelerate(Direction::Right);
    run_ticks(&mut actor, &level, 6);
    assert!(!actor.grounded());

    actor.stop_accelerating(Direction::Right);
    run_ticks(&mut actor, &level, 60);
    assert!(actor.grounded());
    assert_eq!(actor.bounds().bottom(), GROUND_TOP + 200);
}

#[test]
fn quit_press_stops_the_game_for_good() {
    let mut game = game();
    assert!(game.running());

    game.handle_input(InputEvent::release(InputKind::QuitGame, 0));
    assert!(game.running());

    game.handle_input(InputEvent::press(InputKind::QuitGame, 0));
    assert!(!game.running());

    game.handle_input(InputEvent::press(InputKind::GoLeft, 0));
    game.handle_input(InputEvent::release(InputKind::QuitGame, 0));
    game.update();
    assert!(!game.running());
    assert_eq!(game.actors()[HERO_INDEX].speed().x, 0);
}

#[test]
fn quit_press_from_any_actor_index_stops_the_game() {
    let mut game = game();
    game.handle_input(InputEvent::press(InputKind::QuitGame, 7));
    assert!(!game.running());
}

#[test]
fn input_is_routed_to_the_addressed_actor() {
    let mut game = game();
    let hero_start = game.actors()[HERO_INDEX].position();

    game.handle_input(InputEvent::press(InputKind::GoRight, BARNEY_INDEX));
    game.handle_input(InputEvent::press(InputKind::GoLeft, 42));
    game.update();

    assert_eq!(game.actors()[HERO_INDEX].position().x, hero_start.x);
    assert_eq!(game.actors()[BARNEY_INDEX].speed().x, 2);
}

#[test]
fn update_moves_every_actor_then_tracks_the_hero() {
    let mut game = game();
    game.handle_input(InputEvent::press(InputKind::GoLeft, HERO_INDEX));
    for _ in 0..3 {
        game.update();
    }

    let hero = &game.actors()[HERO_INDEX];
    assert_eq!(hero.position().x, 100 - 2 - 4 - 6);
    assert_eq!(game.camera().anchor(), hero.center());
    assert_eq!(
        game.camera().world_to_screen(hero.center()),
        Vec2i::new(400, 300)
    );
}

#[test]
fn camera_can_follow_the_recorded_actor_instead_of_the_hero() {
    let mut game = game().with_tracked_actor(BARNEY_INDEX);
    assert_eq!(
        game.camera().anchor(),
        game.actors()[BARNEY_INDEX].center()
    );

    game.handle_input(InputEvent::press(InputKind::GoRight, BARNEY_INDEX));
    for _ in 0..60 {
        game.update();
    }

    let barney = &game.actors()[BARNEY_INDEX];
    assert!(barney.position().x > 800);
    assert_eq!(game.camera().anchor(), barney.center());
    assert_eq!(
        game.camera().world_to_screen(barney.center()),
        Vec2i::new(400, 300)
    );
}

#[test]
fn unknown_tracked_actor_keeps_following_the_hero() {
    let mut game = game().with_tracked_actor(9);
    game.update();
    assert_eq!(game.camera().anchor(), game.actors()[HERO_INDEX].center());
}

#[test]
fn music_starts_once_at_load_with_a_fade_in() {
    let audio = CountingAudio::default();
    let mut game = Game::load(
        &mut FakeAssets::new(),
        Box::new(audio.clone()),
        InputRecorder::new(),
        (800, 600),
    )
    .expect("game");
    for _ in 0..20 {
        game.update();
    }

    assert_eq!(audio.music_starts.get(), 1);
    assert_eq!(audio.last_fade_in.get(), Duration::from_millis(500));
}

#[test]
fn missing_music_is_not_fatal() {
    let audio = CountingAudio::default();
    let game = Game::load(
        &mut FakeAssets::new().without_sound("music"),
        Box::new(audio.clone()),
        InputRecorder::new(),
        (800, 600),
    );

    assert!(game.is_ok());
    assert_eq!(audio.music_starts.get(), 0);
}

#[test]
fn quit_in_a_playback_script_is_ignored() {
    let mut recorder = InputRecorder::new();
    recorder.playback(vec![
        RecordedInput {
            tick: 0,
            event: InputEvent::press(InputKind::QuitGame, BARNEY_INDEX),
        },
        RecordedInput {
            tick: 1,
            event: InputEvent::press(InputKind::GoLeft, BARNEY_INDEX),
        },
    ]);
    let mut game = game_with_recorder(recorder);
    game.update();
    game.update();

    assert!(game.running());
    assert_eq!(game.actors()[BARNEY_INDEX].speed().x, -2);
}

#[test]
fn render_clears_then_draws_actors_in_list_order_through_the_camera() {
    let mut game = game();
    game.update();
    let mut graphics = RecordingGraphics::default();
    game.render(&mut graphics);

    assert_eq!(graphics.clears, vec![CLEAR_COLOR]);
    assert_eq!(graphics.fills.len(), LEVEL_PLATFORM_IDS.len());
    assert_eq!(graphics.draws.len(), 2);

    let offset = game.camera().offset();
    for (actor, (image, x, y)) in game.actors().iter().zip(&graphics.draws) {
        assert_eq!(*image, actor.current_frame());
        assert_eq!(Vec2i::new(*x, *y), actor.position() - offset);
    }
    let ground = graphics.fills[0];
    assert_eq!(ground.y, GROUND_TOP - offset.y);
}

#[test]
fn window_resize_recenters_the_camera_on_the_hero() {
    let mut game = game();
    game.update();
    let before = game.camera().offset();

    game.window_resized(640, 480);

    assert_eq!(game.camera().offset() - before, Vec2i::new(80, 60));
    let hero_center = game.actors()[HERO_INDEX].center();
    assert_eq!(
        game.camera().world_to_screen(hero_center),
        Vec2i::new(320, 240)
    );
}

#[test]
fn recorded_inputs_replay_to_the_same_state() {
    let script = [
        (0, InputEvent::press(InputKind::GoRight, BARNEY_INDEX)),
        (6, InputEvent::press(InputKind::Jump, BARNEY_INDEX)),
        (7, InputEvent::release(InputKind::Jump, BARNEY_INDEX)),
        (12, InputEvent::press(InputKind::GoLeft, BARNEY_INDEX)),
        (20, InputEvent::release(InputKind::GoLeft, BARNEY_INDEX)),
        (25, InputEvent::release(InputKind::GoRight, BARNEY_INDEX)),
    ];

    let mut recorder = InputRecorder::new();
    recorder.start_recording();
    let mut live = game_with_recorder(recorder);
    for tick in 0..40 {
        for (_, event) in script.iter().filter(|(at, _)| *at == tick) {
            live.handle_input(*event);
        }
        live.update();
    }
    live.handle_input(InputEvent::press(InputKind::QuitGame, BARNEY_INDEX));
    let recorded = live.recorder_mut().stop_recording();
    assert_eq!(recorded.len(), script.len());
    assert_eq!(recorded[1].tick, 6);

    let mut recorder = InputRecorder::new();
    recorder.playback(recorded);
    let mut replay = game_with_recorder(recorder);
    for _ in 0..40 {
        replay.update();
    }

    let live_barney = &live.actors()[BARNEY_INDEX];
    let replay_barney = &replay.actors()[BARNEY_INDEX];
    assert_eq!(replay_barney.position(), live_barney.position());
    assert_eq!(replay_barney.speed(), live_barney.speed());
    assert_eq!(replay_barney.direction(), live_barney.direction());
    assert!(replay.running());
}

#[test]
fn shutdown_writes_the_recording_when_an_output_is_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(BARNEY_INPUTS_FILE);
    let mut recorder = InputRecorder::new();
    recorder.start_recording();
    let mut game = game_with_recorder(recorder).with_recording_output(path.clone());

    game.handle_input(InputEvent::press(InputKind::GoLeft, BARNEY_INDEX));
    game.update();
    game.handle_input(InputEvent::release(InputKind::GoLeft, BARNEY_INDEX));
    game.shutdown();

    let saved = load_recording(&path).expect("load").expect("saved file");
    assert_eq!(
        saved,
        vec![
            RecordedInput {
                tick: 0,
                event: InputEvent::press(InputKind::GoLeft, BARNEY_INDEX),
            },
            RecordedInput {
                tick: 1,
                event: InputEvent::release(InputKind::GoLeft, BARNEY_INDEX),
            },
        ]
    );
}

#[test]
fn loading_fails_fast_on_a_missing_resource() {
    let mut assets = FakeAssets::new().without_rectangle("barney_start");
    let result = Game::load(
        &mut assets,
        Box::new(CountingAudio::default()),
        InputRecorder::new(),
        (800, 600),
    );
    assert!(matches!(
        result,
        Err(AssetError::UnknownRectangle(id)) if id == "barney_start"
    ));
}

#[test]
fn both_actors_resolve_distinct_sprites_once() {
    let mut assets = FakeAssets::new();
    let hero = ActorSprites::load(&mut assets, "gophette", "jump").expect("hero");
    let again = ActorSprites::load(&mut assets, "gophette", "jump").expect("hero again");
    let barney = ActorSprites::load(&mut assets, "barney", "jump").expect("barney");

    assert_eq!(assets.images.len(), 16);
    assert_eq!(hero.run_frames, again.run_frames);
    assert_ne!(hero.jump_frames, barney.jump_frames);
    assert_eq!(hero.size(), ACTOR_SIZE);
}

#[test]
fn camera_starts_centred_on_the_hero() {
    let game = game();
    let expected = Camera::new(800, 600);
    assert_eq!(game.camera().window_size(), expected.window_size());
    assert_eq!(
        game.camera().anchor(),
        game.actors()[HERO_INDEX].center()
    );
}
