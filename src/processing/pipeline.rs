//! Frame pipeline: read a frame, track every object, apply the region effect,
//! draw overlays, write the composite, then handle one control command.

use crate::error::{PipelineError, PipelineResult};
use crate::processing::effects::RegionEffect;
use crate::processing::frame::{fit_to_dimensions, BoundingBox, Frame};
use crate::processing::overlay::{draw_object_count, CountOverlayConfig};
use crate::processing::paths::{PathHistory, TrailStyle};
use crate::processing::tracker::{Tracker, TrackerFactory};
use anyhow::Result;

/// Sequential source of decoded frames
pub trait FrameSource {
    /// Next frame, or `None` once the stream is exhausted
    fn read_frame(&mut self) -> Result<Option<Frame>>;
}

/// Sequential frame writer bound to fixed dimensions
pub trait FrameSink {
    fn dimensions(&self) -> (u32, u32);

    fn write_frame(&mut self, frame: &Frame) -> Result<()>;
}

/// Live commands accepted between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Quit,
    TogglePause,
    /// Select more objects on the held frame (only honoured while paused)
    AddObjects,
}

/// Interactive surface driving the pipeline
pub trait Controller {
    /// Non-blocking poll, called once per iteration
    fn poll_command(&mut self) -> Option<ControlCommand>;

    /// Ask for bounding boxes on a still frame. An empty list means none.
    fn select_regions(&mut self, frame: &Frame) -> Vec<BoundingBox>;

    /// Preview hook, called with every composited frame after it is written
    fn show_frame(&mut self, _frame: &Frame) {}
}

/// Fixed settings for one run
#[derive(Default)]
pub struct PipelineConfig {
    pub effect: RegionEffect,
    pub count_objects: bool,
    pub visualize_paths: bool,
    pub count_overlay: CountOverlayConfig,
    pub trail_style: TrailStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Running,
    Paused,
    SelectingNewObjects,
}

/// A tracker and the stable id its path is recorded under
pub struct TrackedObject {
    pub id: u32,
    tracker: Box<dyn Tracker>,
}

/// Mutable state owned by a run
pub struct PipelineState {
    mode: Mode,
    objects: Vec<TrackedObject>,
    paths: PathHistory,
    next_id: u32,
    frames_read: u64,
    frames_written: u64,
}

impl PipelineState {
    fn new() -> Self {
        Self {
            mode: Mode::Running,
            objects: Vec::new(),
            paths: PathHistory::new(),
            next_id: 0,
            frames_read: 0,
            frames_written: 0,
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn add_object(&mut self, tracker: Box<dyn Tracker>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(TrackedObject { id, tracker });
        id
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::info!(from = ?self.mode, to = ?mode, "pipeline mode changed");
            self.mode = mode;
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames_read: u64,
    pub frames_written: u64,
    pub objects_tracked: usize,
    pub quit_requested: bool,
    pub paths: PathHistory,
}

enum Flow {
    Continue,
    Quit,
}

pub struct Pipeline<F> {
    config: PipelineConfig,
    factory: F,
}

impl<F: TrackerFactory> Pipeline<F> {
    pub fn new(config: PipelineConfig, factory: F) -> Self {
        Self { config, factory }
    }

    /// Process the whole source.
    ///
    /// `initial` boxes refer to the first frame; when empty the controller is
    /// asked to select regions instead. Setup failures are returned before any
    /// frame is written.
    pub fn run(
        &self,
        source: &mut dyn FrameSource,
        sink: Option<&mut dyn FrameSink>,
        controller: &mut dyn Controller,
        initial: Vec<BoundingBox>,
    ) -> PipelineResult<RunSummary> {
        let sink = sink.ok_or(PipelineError::SinkUnavailable)?;
        let (width, height) = sink.dimensions();

        let first = source
            .read_frame()
            .map_err(|e| PipelineError::source_unavailable(format!("{:#}", e)))?
            .ok_or_else(|| PipelineError::source_unavailable("no frames could be read"))?;
        let mut held = fit_to_dimensions(first, width, height);

        let initial = if initial.is_empty() {
            controller.select_regions(&held)
        } else {
            initial
        };
        if initial.is_empty() {
            return Err(PipelineError::NoObjectsSelected);
        }

        let mut state = PipelineState::new();
        state.frames_read = 1;
        for bbox in initial {
            let id = state.add_object(self.factory.create(&held, bbox));
            tracing::debug!(id, %bbox, "tracker initialized");
        }
        tracing::info!(
            objects = state.object_count(),
            effect = %self.config.effect,
            width,
            height,
            "starting pipeline"
        );

        let mut quit_requested = false;
        // The first frame was read during setup and is processed before any new read
        let mut acquire = false;

        loop {
            if acquire && state.mode == Mode::Running {
                let next = source.read_frame().map_err(|e| PipelineError::Source {
                    frame: state.frames_read + 1,
                    source: e.into(),
                })?;
                match next {
                    Some(frame) => {
                        state.frames_read += 1;
                        held = fit_to_dimensions(frame, width, height);
                    }
                    None => {
                        tracing::debug!(frames = state.frames_read, "source exhausted");
                        break;
                    }
                }
            }
            acquire = true;

            let composite = self.composite(&held, &mut state);
            sink.write_frame(&composite).map_err(|e| PipelineError::Sink {
                frame: state.frames_written + 1,
                source: e.into(),
            })?;
            state.frames_written += 1;
            controller.show_frame(&composite);

            if let Some(command) = controller.poll_command() {
                if let Flow::Quit = self.handle_command(command, &mut state, &held, controller) {
                    quit_requested = true;
                    break;
                }
            }
        }

        tracing::info!(
            frames_read = state.frames_read,
            frames_written = state.frames_written,
            objects = state.object_count(),
            "pipeline finished"
        );

        Ok(RunSummary {
            frames_read: state.frames_read,
            frames_written: state.frames_written,
            objects_tracked: state.objects.len(),
            quit_requested,
            paths: state.paths,
        })
    }

    /// Build the output frame for `frame`; trackers always see the untouched source frame
    fn composite(&self, frame: &Frame, state: &mut PipelineState) -> Frame {
        let mut out = frame.clone();

        for object in &mut state.objects {
            let Some(bbox) = object.tracker.update(frame) else {
                tracing::debug!(id = object.id, "tracker lost object");
                continue;
            };

            if !self.config.effect.apply_in_place(&mut out, &bbox) {
                tracing::trace!(id = object.id, %bbox, "tracked box outside frame");
                continue;
            }

            if self.config.visualize_paths {
                state.paths.push(object.id, bbox.center());
            }
        }

        if self.config.count_objects {
            draw_object_count(&mut out, state.objects.len(), &self.config.count_overlay);
        }

        if self.config.visualize_paths {
            state.paths.draw(&mut out, &self.config.trail_style);
        }

        out
    }

    fn handle_command(
        &self,
        command: ControlCommand,
        state: &mut PipelineState,
        held: &Frame,
        controller: &mut dyn Controller,
    ) -> Flow {
        match (command, state.mode) {
            (ControlCommand::Quit, _) => return Flow::Quit,
            (ControlCommand::TogglePause, Mode::Running) => state.set_mode(Mode::Paused),
            (ControlCommand::TogglePause, _) => state.set_mode(Mode::Running),
            (ControlCommand::AddObjects, Mode::Paused) => {
                state.set_mode(Mode::SelectingNewObjects);
                for bbox in controller.select_regions(held) {
                    let id = state.add_object(self.factory.create(held, bbox));
                    tracing::info!(id, %bbox, "tracker added");
                }
                state.set_mode(Mode::Paused);
            }
            (ControlCommand::AddObjects, _) => {
                tracing::debug!("ignoring add request while not paused");
            }
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::overlay::draw_text;
    use crate::processing::tracker::TemplateTrackerFactory;
    use image::Rgb;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    struct VecSource {
        frames: VecDeque<Frame>,
    }

    impl VecSource {
        fn new(frames: Vec<Frame>) -> Self {
            Self {
                frames: frames.into(),
            }
        }
    }

    impl FrameSource for VecSource {
        fn read_frame(&mut self) -> Result<Option<Frame>> {
            Ok(self.frames.pop_front())
        }
    }

    struct VecSink {
        width: u32,
        height: u32,
        frames: Vec<Frame>,
    }

    impl VecSink {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                frames: Vec::new(),
            }
        }
    }

    impl FrameSink for VecSink {
        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn write_frame(&mut self, frame: &Frame) -> Result<()> {
            if frame.dimensions() != (self.width, self.height) {
                anyhow::bail!("frame size mismatch: {:?}", frame.dimensions());
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct ScriptedController {
        commands: VecDeque<Option<ControlCommand>>,
        selections: VecDeque<Vec<BoundingBox>>,
        selection_calls: usize,
        shown: usize,
        on_show: Option<Box<dyn FnMut(usize)>>,
    }

    impl ScriptedController {
        fn with_commands(commands: Vec<Option<ControlCommand>>) -> Self {
            Self {
                commands: commands.into(),
                ..Default::default()
            }
        }
    }

    impl Controller for ScriptedController {
        fn poll_command(&mut self) -> Option<ControlCommand> {
            self.commands.pop_front().flatten()
        }

        fn select_regions(&mut self, _frame: &Frame) -> Vec<BoundingBox> {
            self.selection_calls += 1;
            self.selections.pop_front().unwrap_or_default()
        }

        fn show_frame(&mut self, _frame: &Frame) {
            self.shown += 1;
            if let Some(callback) = self.on_show.as_mut() {
                callback(self.shown);
            }
        }
    }

    /// Replays a fixed list of results, then repeats the last one
    struct ScriptedTracker {
        results: VecDeque<Option<BoundingBox>>,
        last: Option<BoundingBox>,
    }

    impl Tracker for ScriptedTracker {
        fn update(&mut self, _frame: &Frame) -> Option<BoundingBox> {
            if let Some(result) = self.results.pop_front() {
                self.last = result;
            }
            self.last
        }
    }

    fn fixed_tracker(_frame: &Frame, bbox: BoundingBox) -> Box<dyn Tracker> {
        Box::new(ScriptedTracker {
            results: VecDeque::new(),
            last: Some(bbox),
        })
    }

    fn lost_tracker(_frame: &Frame, _bbox: BoundingBox) -> Box<dyn Tracker> {
        Box::new(ScriptedTracker {
            results: VecDeque::new(),
            last: None,
        })
    }

    fn gradient(width: u32, height: u32, seed: u32) -> Frame {
        Frame::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 13 + seed) % 256) as u8,
                ((y * 17 + seed * 3) % 256) as u8,
                ((x * y + seed) % 256) as u8,
            ])
        })
    }

    fn pixelate_config() -> PipelineConfig {
        PipelineConfig {
            effect: RegionEffect::Pixelate { block_size: 10 },
            ..Default::default()
        }
    }

    #[test]
    fn test_pixelates_static_region_in_every_frame() {
        let input = gradient(40, 40, 0);
        let mut source = VecSource::new(vec![input.clone(), input.clone(), input.clone()]);
        let mut sink = VecSink::new(40, 40);
        let mut controller = ScriptedController::default();
        let pipeline = Pipeline::new(pixelate_config(), TemplateTrackerFactory::default());

        let summary = pipeline
            .run(
                &mut source,
                Some(&mut sink),
                &mut controller,
                vec![BoundingBox::new(10, 10, 10, 10)],
            )
            .unwrap();

        assert_eq!(summary.frames_written, 3);
        assert_eq!(sink.frames.len(), 3);
        for frame in &sink.frames {
            let fill = *frame.get_pixel(10, 10);
            for (x, y, pixel) in frame.enumerate_pixels() {
                if (10..20).contains(&x) && (10..20).contains(&y) {
                    assert_eq!(*pixel, fill);
                } else {
                    assert_eq!(pixel, input.get_pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn test_creates_one_tracker_per_initial_box_before_next_frame() {
        let created = Rc::new(Cell::new(0));
        let counter = Rc::clone(&created);
        let factory = move |frame: &Frame, bbox: BoundingBox| -> Box<dyn Tracker> {
            counter.set(counter.get() + 1);
            fixed_tracker(frame, bbox)
        };

        let seen_at_first_show = Rc::new(Cell::new(0));
        let seen = Rc::clone(&seen_at_first_show);
        let observed = Rc::clone(&created);
        let mut controller = ScriptedController {
            on_show: Some(Box::new(move |shown| {
                if shown == 1 {
                    seen.set(observed.get());
                }
            })),
            ..Default::default()
        };

        let mut source = VecSource::new(vec![gradient(30, 30, 0), gradient(30, 30, 1)]);
        let mut sink = VecSink::new(30, 30);
        let boxes = vec![
            BoundingBox::new(0, 0, 5, 5),
            BoundingBox::new(10, 10, 5, 5),
            BoundingBox::new(20, 20, 5, 5),
        ];

        let summary = Pipeline::new(PipelineConfig::default(), factory)
            .run(&mut source, Some(&mut sink), &mut controller, boxes)
            .unwrap();

        assert_eq!(seen_at_first_show.get(), 3);
        assert_eq!(created.get(), 3);
        assert_eq!(summary.objects_tracked, 3);
    }

    #[test]
    fn test_lost_tracker_leaves_region_and_path_untouched() {
        let bbox = BoundingBox::new(5, 5, 10, 10);
        let factory = move |_: &Frame, _: BoundingBox| -> Box<dyn Tracker> {
            Box::new(ScriptedTracker {
                results: vec![Some(bbox), None, Some(bbox)].into(),
                last: None,
            })
        };
        let frames: Vec<Frame> = (0..3).map(|i| gradient(30, 30, i)).collect();
        let mut source = VecSource::new(frames.clone());
        let mut sink = VecSink::new(30, 30);
        let config = PipelineConfig {
            effect: RegionEffect::Sepia,
            visualize_paths: true,
            ..Default::default()
        };

        let summary = Pipeline::new(config, factory)
            .run(
                &mut source,
                Some(&mut sink),
                &mut ScriptedController::default(),
                vec![bbox],
            )
            .unwrap();

        assert_eq!(sink.frames.len(), 3);
        // Frame 2: tracker failed, nothing changed (one path point exists, so no trail yet)
        assert_eq!(sink.frames[1], frames[1]);
        assert_ne!(sink.frames[0].get_pixel(8, 8), frames[0].get_pixel(8, 8));
        assert_eq!(summary.paths.len(0), 2);
        // Lost trackers are kept
        assert_eq!(summary.objects_tracked, 1);
    }

    #[test]
    fn test_mismatched_frames_are_rescaled() {
        let frames = vec![gradient(64, 48, 0), gradient(40, 40, 1), gradient(32, 24, 2)];
        let mut source = VecSource::new(frames);
        let mut sink = VecSink::new(32, 24);

        let summary = Pipeline::new(PipelineConfig::default(), fixed_tracker)
            .run(
                &mut source,
                Some(&mut sink),
                &mut ScriptedController::default(),
                vec![BoundingBox::new(2, 2, 8, 8)],
            )
            .unwrap();

        assert_eq!(summary.frames_written, 3);
        assert!(sink.frames.iter().all(|f| f.dimensions() == (32, 24)));
    }

    #[test]
    fn test_pause_holds_frame_but_keeps_writing() {
        let frames: Vec<Frame> = (0..3).map(|i| gradient(20, 20, i * 40)).collect();
        let mut source = VecSource::new(frames.clone());
        let mut sink = VecSink::new(20, 20);
        let mut controller = ScriptedController::with_commands(vec![
            Some(ControlCommand::TogglePause),
            None,
            Some(ControlCommand::TogglePause),
        ]);

        let summary = Pipeline::new(PipelineConfig::default(), lost_tracker)
            .run(
                &mut source,
                Some(&mut sink),
                &mut controller,
                vec![BoundingBox::new(0, 0, 4, 4)],
            )
            .unwrap();

        assert_eq!(summary.frames_read, 3);
        assert_eq!(summary.frames_written, 5);
        let expected = vec![
            frames[0].clone(),
            frames[0].clone(),
            frames[0].clone(),
            frames[1].clone(),
            frames[2].clone(),
        ];
        assert_eq!(sink.frames, expected);
        assert_eq!(controller.shown, 5);
    }

    #[test]
    fn test_paused_frame_is_not_processed_twice() {
        let mut source = VecSource::new(vec![gradient(30, 30, 0)]);
        let mut sink = VecSink::new(30, 30);
        let mut controller = ScriptedController::with_commands(vec![
            Some(ControlCommand::TogglePause),
            None,
            None,
            Some(ControlCommand::Quit),
        ]);
        let config = PipelineConfig {
            effect: RegionEffect::Blur { sigma: 3.0 },
            ..Default::default()
        };

        Pipeline::new(config, fixed_tracker)
            .run(
                &mut source,
                Some(&mut sink),
                &mut controller,
                vec![BoundingBox::new(5, 5, 20, 20)],
            )
            .unwrap();

        assert_eq!(sink.frames.len(), 4);
        assert!(sink.frames.iter().all(|f| *f == sink.frames[0]));
    }

    #[test]
    fn test_add_objects_only_while_paused() {
        let frames: Vec<Frame> = (0..6).map(|i| gradient(40, 40, i)).collect();
        let mut source = VecSource::new(frames);
        let mut sink = VecSink::new(40, 40);
        let mut controller = ScriptedController::with_commands(vec![
            Some(ControlCommand::AddObjects),
            Some(ControlCommand::TogglePause),
            Some(ControlCommand::AddObjects),
            Some(ControlCommand::TogglePause),
        ]);
        controller
            .selections
            .push_back(vec![BoundingBox::new(30, 30, 6, 6)]);
        let config = PipelineConfig {
            visualize_paths: true,
            ..Default::default()
        };

        let summary = Pipeline::new(config, fixed_tracker)
            .run(
                &mut source,
                Some(&mut sink),
                &mut controller,
                vec![BoundingBox::new(0, 0, 6, 6), BoundingBox::new(10, 10, 6, 6)],
            )
            .unwrap();

        assert_eq!(controller.selection_calls, 1);
        assert_eq!(summary.objects_tracked, 3);
        let ids: Vec<u32> = summary.paths.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        // Existing ids keep their history; the new object starts where it was added
        assert!(summary.paths.len(0) > summary.paths.len(2));
        assert_eq!(summary.paths.get(2).unwrap().back(), Some(&(33, 33)));
    }

    #[test]
    fn test_trails_are_drawn_into_written_frames() {
        let green = Rgb([0, 255, 0]);
        let factory = |_: &Frame, _: BoundingBox| -> Box<dyn Tracker> {
            Box::new(ScriptedTracker {
                results: vec![
                    Some(BoundingBox::new(5, 15, 4, 4)),
                    Some(BoundingBox::new(25, 15, 4, 4)),
                    Some(BoundingBox::new(45, 15, 4, 4)),
                ]
                .into(),
                last: None,
            })
        };
        let black = Frame::new(60, 40);
        let mut source = VecSource::new(vec![black.clone(), black.clone(), black.clone()]);
        let mut sink = VecSink::new(60, 40);
        let config = PipelineConfig {
            effect: RegionEffect::Sepia,
            visualize_paths: true,
            ..Default::default()
        };

        Pipeline::new(config, factory)
            .run(
                &mut source,
                Some(&mut sink),
                &mut ScriptedController::default(),
                vec![BoundingBox::new(5, 15, 4, 4)],
            )
            .unwrap();

        assert_eq!(sink.frames.len(), 3);
        // One center so far: nothing to connect
        assert!(sink.frames[0].pixels().all(|p| *p != green));
        // Centers (7, 17) -> (27, 17)
        assert_eq!(*sink.frames[1].get_pixel(17, 17), green);
        assert_ne!(*sink.frames[1].get_pixel(37, 17), green);
        // Trail extends to (47, 17) and keeps the earlier segment
        assert_eq!(*sink.frames[2].get_pixel(17, 17), green);
        assert_eq!(*sink.frames[2].get_pixel(37, 17), green);
        assert_ne!(*sink.frames[2].get_pixel(17, 30), green);
    }

    #[test]
    fn test_count_overlay_on_every_frame() {
        let black = Frame::new(400, 100);
        let mut source = VecSource::new(vec![black.clone(), black.clone(), black.clone()]);
        let mut sink = VecSink::new(400, 100);
        let config = PipelineConfig {
            effect: RegionEffect::Sepia,
            count_objects: true,
            ..Default::default()
        };

        Pipeline::new(config, fixed_tracker)
            .run(
                &mut source,
                Some(&mut sink),
                &mut ScriptedController::default(),
                vec![BoundingBox::new(300, 60, 20, 20), BoundingBox::new(350, 60, 20, 20)],
            )
            .unwrap();

        let mut expected = black.clone();
        draw_text(&mut expected, "Objects Tracked: 2", 10, 30, 3, Rgb([0, 255, 0]));
        assert_eq!(sink.frames.len(), 3);
        assert!(sink.frames.iter().all(|f| *f == expected));
    }

    #[test]
    fn test_quit_stops_reading() {
        let frames: Vec<Frame> = (0..10).map(|i| gradient(16, 16, i)).collect();
        let mut source = VecSource::new(frames);
        let mut sink = VecSink::new(16, 16);
        let mut controller =
            ScriptedController::with_commands(vec![None, Some(ControlCommand::Quit)]);

        let summary = Pipeline::new(PipelineConfig::default(), fixed_tracker)
            .run(
                &mut source,
                Some(&mut sink),
                &mut controller,
                vec![BoundingBox::new(0, 0, 4, 4)],
            )
            .unwrap();

        assert!(summary.quit_requested);
        assert_eq!(sink.frames.len(), 2);
        assert_eq!(source.frames.len(), 8);
    }

    #[test]
    fn test_missing_sink() {
        let mut source = VecSource::new(vec![gradient(8, 8, 0)]);
        let result = Pipeline::new(PipelineConfig::default(), fixed_tracker).run(
            &mut source,
            None,
            &mut ScriptedController::default(),
            vec![BoundingBox::new(0, 0, 2, 2)],
        );
        assert!(matches!(result, Err(PipelineError::SinkUnavailable)));
        assert_eq!(source.frames.len(), 1);
    }

    #[test]
    fn test_empty_source() {
        let mut source = VecSource::new(Vec::new());
        let mut sink = VecSink::new(8, 8);
        let result = Pipeline::new(PipelineConfig::default(), fixed_tracker).run(
            &mut source,
            Some(&mut sink),
            &mut ScriptedController::default(),
            vec![BoundingBox::new(0, 0, 2, 2)],
        );
        assert!(matches!(result, Err(PipelineError::SourceUnavailable { .. })));
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_no_objects_selected() {
        let mut source = VecSource::new(vec![gradient(8, 8, 0)]);
        let mut sink = VecSink::new(8, 8);
        let mut controller = ScriptedController::default();
        let result = Pipeline::new(PipelineConfig::default(), fixed_tracker).run(
            &mut source,
            Some(&mut sink),
            &mut controller,
            Vec::new(),
        );
        assert!(matches!(result, Err(PipelineError::NoObjectsSelected)));
        assert_eq!(controller.selection_calls, 1);
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_initial_selection_from_controller() {
        let mut source = VecSource::new(vec![gradient(8, 8, 0), gradient(8, 8, 1)]);
        let mut sink = VecSink::new(8, 8);
        let mut controller = ScriptedController::default();
        controller
            .selections
            .push_back(vec![BoundingBox::new(1, 1, 3, 3)]);

        let summary = Pipeline::new(PipelineConfig::default(), fixed_tracker)
            .run(&mut source, Some(&mut sink), &mut controller, Vec::new())
            .unwrap();

        assert_eq!(summary.objects_tracked, 1);
        assert_eq!(summary.frames_written, 2);
    }
}
