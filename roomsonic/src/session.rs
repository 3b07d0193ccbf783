use crate::backend::{AudioGraph, SceneEngine, SourceOptions};
use crate::config::SessionDesc;
use crate::controls::{ControlPanel, ControlParameter};
use crate::error::{Result, RoomSonicError};
use crate::events::RoomSonicEvent;
use crate::math::{Vec2, Vec3};
use crate::preset::{ParameterBundle, PresetApplier};
use crate::scene::{MaterialCoefficients, MaterialTable, Room, RoomPreset, RoomProperties};
use crate::spatial::{MappedPositions, PositionMapper, SoundSourceChannel, SourceControls};
use crate::validation::check_parameter;
use crossbeam_channel::{Receiver, Sender, TrySendError};

/// Events kept until [`RoomSession::poll_events`] drains them.
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

/// Audio-side state that only exists between `initialize` and `shutdown`.
struct Runtime<G, S> {
    graph: G,
    scene: S,
    channels: Vec<SoundSourceChannel>,
}

/// Context object owning everything one room demo needs.
///
/// `RoomSession` holds the active room, the material table, the normalized
/// layout of every source plus the listener, the mapped 3D positions and the
/// control panel. Once [`initialize`](Self::initialize)d it also owns the audio
/// graph, the scene engine and one [`SoundSourceChannel`] per source.
///
/// Every operation runs to completion on the caller's thread; the most recent
/// write to a parameter wins.
///
/// # Example
///
/// ```
/// use roomsonic::backend::{MemoryGraph, MemoryScene};
/// use roomsonic::{RoomSession, SessionDesc, Vec2};
///
/// let mut session = RoomSession::new(SessionDesc::default())?;
/// session.initialize(MemoryGraph::new(), MemoryScene::new())?;
///
/// session.select_room("medium", "curtains")?;
/// session.set_listener_position(Vec2::new(0.5, 0.25))?;
/// session.apply_preset("faraway")?;
///
/// assert_eq!(session.controls().snapshot().reverb_gain, 0.7);
/// # Ok::<(), roomsonic::RoomSonicError>(())
/// ```
pub struct RoomSession<G: AudioGraph, S: SceneEngine> {
    desc: SessionDesc,
    materials: MaterialTable,
    preset: RoomPreset,
    room: Room,
    layout: Vec<Vec2>,
    height_override: Option<f32>,
    mapper: PositionMapper,
    positions: MappedPositions,
    controls: ControlPanel,
    runtime: Option<Runtime<G, S>>,
    event_sender: Sender<RoomSonicEvent>,
    event_receiver: Receiver<RoomSonicEvent>,
}

impl<G: AudioGraph, S: SceneEngine> RoomSession<G, S> {
    /// Resolves the initial room and maps the initial layout.
    ///
    /// No audio objects are created until [`initialize`](Self::initialize).
    pub fn new(desc: SessionDesc) -> Result<Self> {
        desc.validate()?;

        let materials = MaterialTable::with_presets();
        let preset = RoomPreset::new(desc.dimension, desc.material);
        let room = preset.room(&materials)?;
        let mapper = PositionMapper::new(desc.coordinate_policy);
        let positions = mapper.map_layout(&desc.layout, &room.dimensions(), desc.height_override)?;
        let (event_sender, event_receiver) = crossbeam_channel::bounded(EVENT_QUEUE_CAPACITY);

        Ok(Self {
            layout: desc.layout.clone(),
            height_override: desc.height_override,
            controls: ControlPanel::new(desc.initial_bundle),
            desc,
            materials,
            preset,
            room,
            mapper,
            positions,
            runtime: None,
            event_sender,
            event_receiver,
        })
    }

    /// Builds one signal chain per source, registers the sources with the scene
    /// engine, pushes the room and positions and commits the control panel values.
    ///
    /// # Errors
    ///
    /// Fails with [`RoomSonicError::Configuration`] if already initialized, or with
    /// whatever the graph or scene engine reports.
    pub fn initialize(&mut self, mut graph: G, mut scene: S) -> Result<()> {
        if self.runtime.is_some() {
            return Err(RoomSonicError::Configuration(
                "Session is already initialized".into(),
            ));
        }

        let source_count = self.source_count();
        log::info!(
            "Initializing room session with {} source(s) in {} / {} room",
            source_count,
            self.preset.dimension,
            self.preset.material
        );

        scene.set_ambisonic_order(self.desc.ambisonic_order)?;
        scene.set_room_properties(&self.room.properties(&self.materials)?)?;

        let options = SourceOptions::with_rolloff(self.desc.rolloff);
        let max_delay = self.desc.reverb_max_duration;
        let mut channels = (0..source_count)
            .map(|index| {
                SoundSourceChannel::build(index, &mut graph, &mut scene, &options, max_delay)
            })
            .collect::<Result<Vec<_>>>()?;

        for (channel, position) in channels.iter_mut().zip(&self.positions.sources) {
            channel.set_position(&mut scene, *position)?;
        }
        scene.set_listener_position(self.positions.listener)?;

        self.applier()
            .apply(self.controls.snapshot(), &mut channels, &mut graph)?;

        self.runtime = Some(Runtime {
            graph,
            scene,
            channels,
        });
        self.emit(RoomSonicEvent::Initialized { source_count });
        Ok(())
    }

    /// Drops every source channel and hands the collaborators back.
    pub fn shutdown(&mut self) -> Result<(G, S)> {
        let runtime = self.runtime.take().ok_or_else(|| {
            RoomSonicError::NotInitialized("Cannot shut down an uninitialized session".into())
        })?;
        log::info!("Room session shut down");
        self.emit(RoomSonicEvent::ShutDown);
        Ok((runtime.graph, runtime.scene))
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn desc(&self) -> &SessionDesc {
        &self.desc
    }

    pub fn source_count(&self) -> usize {
        self.layout.len() - 1
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// The active room resolved against the current material table.
    pub fn room_properties(&self) -> Result<RoomProperties> {
        self.room.properties(&self.materials)
    }

    pub fn room_preset(&self) -> RoomPreset {
        self.preset
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    /// Mirrored display values of the five uniform controls.
    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn layout(&self) -> &[Vec2] {
        &self.layout
    }

    pub fn positions(&self) -> &MappedPositions {
        &self.positions
    }

    pub fn source_positions(&self) -> &[Vec3] {
        &self.positions.sources
    }

    pub fn listener_position(&self) -> Vec3 {
        self.positions.listener
    }

    pub fn graph(&self) -> Option<&G> {
        self.runtime.as_ref().map(|runtime| &runtime.graph)
    }

    pub fn scene(&self) -> Option<&S> {
        self.runtime.as_ref().map(|runtime| &runtime.scene)
    }

    /// Source channels; empty until initialized.
    pub fn sources(&self) -> &[SoundSourceChannel] {
        self.runtime
            .as_ref()
            .map(|runtime| runtime.channels.as_slice())
            .unwrap_or(&[])
    }

    pub fn source(&self, index: usize) -> Result<&SoundSourceChannel> {
        let runtime = self.runtime_ref()?;
        runtime
            .channels
            .get(index)
            .ok_or(RoomSonicError::UnknownSource(index))
    }

    /// Per-source handle exposing only the reverb and attenuation operations.
    pub fn source_controls(&mut self, index: usize) -> Result<SourceControls<'_>> {
        let runtime = self.runtime_mut()?;
        let channel = runtime
            .channels
            .get_mut(index)
            .ok_or(RoomSonicError::UnknownSource(index))?;
        Ok(SourceControls {
            channel,
            graph: &mut runtime.graph,
        })
    }

    /// Switches to the named geometry and material bundle.
    ///
    /// On success the room is replaced as a whole and every source and listener
    /// position is recomputed against the new bounds. On failure nothing changes.
    pub fn select_room(&mut self, dimension_key: &str, material_key: &str) -> Result<()> {
        let preset = RoomPreset::parse(dimension_key, material_key)?;
        self.apply_room_preset(preset)
    }

    pub fn apply_room_preset(&mut self, preset: RoomPreset) -> Result<()> {
        let room = preset.room(&self.materials)?;
        let properties = room.properties(&self.materials)?;
        let positions =
            self.mapper
                .map_layout(&self.layout, &room.dimensions(), self.height_override)?;

        self.push_to_scene(Some(&properties), &positions)?;

        log::info!("Room changed to {} / {}", preset.dimension, preset.material);
        self.room = room;
        self.preset = preset;
        self.emit(RoomSonicEvent::RoomChanged {
            dimension: preset.dimension,
            material: preset.material,
        });
        self.commit_positions(positions);
        Ok(())
    }

    /// Registers a material, replacing the table as a whole.
    ///
    /// If the active room uses `name`, its resolved properties are pushed to the
    /// scene again.
    pub fn register_material(
        &mut self,
        name: &str,
        coefficients: MaterialCoefficients,
    ) -> Result<()> {
        let mut materials = self.materials.clone();
        materials.insert(name, coefficients);

        let in_use = self.room.materials().iter().any(|(_, m)| m == name);
        if in_use {
            if let Some(runtime) = self.runtime.as_mut() {
                runtime
                    .scene
                    .set_room_properties(&self.room.properties(&materials)?)?;
            }
        }

        log::debug!("Registered material '{}'", name);
        self.materials = materials;
        Ok(())
    }

    /// Moves one element of the layout. Index `source_count()` is the listener.
    pub fn set_element_position(&mut self, index: usize, normalized: Vec2) -> Result<()> {
        if index >= self.layout.len() {
            return Err(RoomSonicError::UnknownSource(index));
        }
        let mut layout = self.layout.clone();
        layout[index] = normalized;
        self.replace_layout(layout)
    }

    pub fn set_listener_position(&mut self, normalized: Vec2) -> Result<()> {
        self.set_element_position(self.source_count(), normalized)
    }

    /// Replaces the whole layout; the length must match the session's.
    pub fn set_layout(&mut self, layout: &[Vec2]) -> Result<()> {
        if layout.len() != self.layout.len() {
            return Err(RoomSonicError::Configuration(format!(
                "Layout must have {} elements, got {}",
                self.layout.len(),
                layout.len()
            )));
        }
        self.replace_layout(layout.to_vec())
    }

    pub fn height_override(&self) -> Option<f32> {
        self.height_override
    }

    /// Sets the fixed source height. The listener is unaffected.
    pub fn set_height_override(&mut self, height: Option<f32>) -> Result<()> {
        if let Some(value) = height {
            if !value.is_finite() {
                return Err(RoomSonicError::Range(format!(
                    "Height override must be finite, got {}",
                    value
                )));
            }
        }
        let positions =
            self.mapper
                .map_layout(&self.layout, &self.room.dimensions(), height)?;
        self.push_to_scene(None, &positions)?;
        self.height_override = height;
        self.commit_positions(positions);
        Ok(())
    }

    pub fn set_manual_gain(&mut self, gain: f32) -> Result<()> {
        self.set_control(ControlParameter::ManualGain, gain)
    }

    pub fn set_reverb_delay(&mut self, seconds: f32) -> Result<()> {
        self.set_control(ControlParameter::ReverbDelay, seconds)
    }

    pub fn set_reverb_gain(&mut self, gain: f32) -> Result<()> {
        self.set_control(ControlParameter::ReverbGain, gain)
    }

    pub fn set_reverb_cutoff(&mut self, hz: f32) -> Result<()> {
        self.set_control(ControlParameter::ReverbCutoff, hz)
    }

    pub fn set_general_cutoff(&mut self, hz: f32) -> Result<()> {
        self.set_control(ControlParameter::GeneralCutoff, hz)
    }

    /// Writes one control to every source and mirrors it into the control panel.
    ///
    /// If the graph rejects the write for any source, sources already written are
    /// restored so that no source is left with the new value.
    pub fn set_control(&mut self, parameter: ControlParameter, value: f32) -> Result<()> {
        let policy = self.desc.parameter_policy;
        let max_delay = self.desc.reverb_max_duration;
        let runtime = self.runtime_mut()?;
        check_parameter(policy, parameter, value, max_delay)?;

        let previous: Vec<f32> = runtime
            .channels
            .iter()
            .map(|channel| channel.control(parameter))
            .collect();

        for position in 0..runtime.channels.len() {
            let written = runtime.channels[position].set_control(&mut runtime.graph, parameter, value);
            if let Err(err) = written {
                log::warn!(
                    "Writing {} = {} failed on source {}: {}",
                    parameter,
                    value,
                    position,
                    err
                );
                for (channel, old) in runtime.channels[..=position].iter_mut().zip(&previous) {
                    if let Err(restore_err) =
                        channel.set_control(&mut runtime.graph, parameter, *old)
                    {
                        log::warn!(
                            "Could not restore {} on source {}: {}",
                            parameter,
                            channel.index(),
                            restore_err
                        );
                    }
                }
                return Err(err);
            }
        }

        log::debug!("Set {} = {} on {} source(s)", parameter, value, previous.len());
        self.controls.set(parameter, value);
        self.emit(RoomSonicEvent::ParameterChanged { parameter, value });
        Ok(())
    }

    /// Applies a built-in bundle ("close" or "faraway") to every source.
    pub fn apply_preset(&mut self, name: &str) -> Result<()> {
        let bundle = ParameterBundle::named(name)?;
        self.commit_bundle(bundle, name)
    }

    /// Applies an arbitrary bundle to every source.
    pub fn apply_bundle(&mut self, bundle: ParameterBundle) -> Result<()> {
        self.commit_bundle(bundle, "custom")
    }

    /// Drains all events emitted since the last poll.
    ///
    /// At most [`EVENT_QUEUE_CAPACITY`] events are kept; when the queue is full
    /// the oldest event is dropped to make room.
    pub fn poll_events(&self) -> Vec<RoomSonicEvent> {
        self.event_receiver.try_iter().collect()
    }

    fn commit_bundle(&mut self, bundle: ParameterBundle, label: &str) -> Result<()> {
        let applier = self.applier();
        let runtime = self.runtime_mut()?;
        applier.apply(bundle, &mut runtime.channels, &mut runtime.graph)?;

        log::info!("Applied preset '{}' to {} source(s)", label, runtime.channels.len());
        self.controls.set_all(bundle);
        self.emit(RoomSonicEvent::PresetApplied {
            preset: label.to_string(),
        });
        Ok(())
    }

    fn applier(&self) -> PresetApplier {
        PresetApplier::new(self.desc.parameter_policy, self.desc.reverb_max_duration)
    }

    fn replace_layout(&mut self, layout: Vec<Vec2>) -> Result<()> {
        let positions =
            self.mapper
                .map_layout(&layout, &self.room.dimensions(), self.height_override)?;
        self.push_to_scene(None, &positions)?;
        self.layout = layout;
        self.commit_positions(positions);
        Ok(())
    }

    /// Forwards a room (if given) and positions to the scene engine.
    ///
    /// If any write fails, the current room and positions are written back and
    /// the error is returned. Session state is never touched here.
    fn push_to_scene(
        &mut self,
        room: Option<&RoomProperties>,
        positions: &MappedPositions,
    ) -> Result<()> {
        let Some(runtime) = self.runtime.as_mut() else {
            return Ok(());
        };

        if let Err(err) = write_scene(runtime, room, positions) {
            log::warn!("Scene update failed: {}; restoring previous state", err);
            let previous_room = room.and_then(|_| self.room.properties(&self.materials).ok());
            if let Err(restore_err) = write_scene(runtime, previous_room.as_ref(), &self.positions)
            {
                log::warn!("Could not restore scene: {}", restore_err);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Stores positions the scene engine has accepted and emits a change event
    /// for every element that moved.
    fn commit_positions(&mut self, positions: MappedPositions) {
        let old = std::mem::replace(&mut self.positions, positions);
        log::debug!(
            "Recomputed positions: {} source(s), listener at {}",
            self.positions.sources.len(),
            self.positions.listener
        );

        let mut events = Vec::new();
        for (source, (old_position, new_position)) in old
            .sources
            .iter()
            .zip(&self.positions.sources)
            .enumerate()
        {
            if old_position != new_position {
                events.push(RoomSonicEvent::SourcePositionChanged {
                    source,
                    old_position: *old_position,
                    new_position: *new_position,
                });
            }
        }
        if old.listener != self.positions.listener {
            events.push(RoomSonicEvent::ListenerPositionChanged {
                old_position: old.listener,
                new_position: self.positions.listener,
            });
        }
        for event in events {
            self.emit(event);
        }
    }

    fn runtime_ref(&self) -> Result<&Runtime<G, S>> {
        self.runtime.as_ref().ok_or_else(not_initialized)
    }

    fn runtime_mut(&mut self) -> Result<&mut Runtime<G, S>> {
        self.runtime.as_mut().ok_or_else(not_initialized)
    }

    fn emit(&self, event: RoomSonicEvent) {
        let mut pending = event;
        loop {
            match self.event_sender.try_send(pending) {
                Ok(()) => return,
                Err(TrySendError::Full(event)) => {
                    if let Ok(dropped) = self.event_receiver.try_recv() {
                        log::trace!("Event queue full, dropping {:?}", dropped);
                    }
                    pending = event;
                }
                Err(TrySendError::Disconnected(_)) => {
                    log::warn!("Event queue disconnected");
                    return;
                }
            }
        }
    }
}

fn write_scene<G, S: SceneEngine>(
    runtime: &mut Runtime<G, S>,
    room: Option<&RoomProperties>,
    positions: &MappedPositions,
) -> Result<()> {
    if let Some(room) = room {
        runtime.scene.set_room_properties(room)?;
    }
    for (channel, position) in runtime.channels.iter_mut().zip(&positions.sources) {
        channel.set_position(&mut runtime.scene, *position)?;
    }
    runtime.scene.set_listener_position(positions.listener)
}

fn not_initialized() -> RoomSonicError {
    RoomSonicError::NotInitialized(
        "Signal chains do not exist yet; call RoomSession::initialize first".into(),
    )
}
