use anyhow::{Context, Result, bail};
use roomsonic::backend::{MemoryGraph, MemoryScene};
use roomsonic::{
    BundleName, ControlParameter, ParameterPolicy, RoomDimensionPreset, RoomMaterialPreset,
    RoomPreset, RoomSession, SessionDesc, Vec2, WallFace,
};

pub const USAGE: &str = "\
Usage: roomsonic-demo [OPTIONS]

Options:
  --dimension <small|medium|large|huge>       Starting room size (default: huge)
  --material <brick|curtains|marble|outside>  Starting wall materials (default: outside)
  --preset <close|faraway>                    Preset applied after the walkthrough (default: faraway)
  --height <meters>                           Fixed source height
  --strict                                    Reject out-of-range parameter values
  -h, --help                                  Print this help";

#[derive(Debug, Clone)]
pub struct DemoArgs {
    pub dimension: RoomDimensionPreset,
    pub material: RoomMaterialPreset,
    pub preset: BundleName,
    pub height: Option<f32>,
    pub strict: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            dimension: RoomDimensionPreset::default(),
            material: RoomMaterialPreset::default(),
            preset: BundleName::Faraway,
            height: None,
            strict: false,
        }
    }
}

impl DemoArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter();

        while let Some(flag) = iter.next() {
            match flag.as_str() {
                "--strict" => parsed.strict = true,
                "--dimension" | "--material" | "--preset" | "--height" => {
                    let value = iter
                        .next()
                        .with_context(|| format!("Missing value for {}", flag))?;
                    match flag.as_str() {
                        "--dimension" => parsed.dimension = value.parse()?,
                        "--material" => parsed.material = value.parse()?,
                        "--preset" => parsed.preset = value.parse()?,
                        _ => {
                            parsed.height = Some(
                                value
                                    .parse()
                                    .with_context(|| format!("Invalid height '{}'", value))?,
                            )
                        }
                    }
                }
                other => bail!("Unknown argument '{}'\n\n{}", other, USAGE),
            }
        }

        Ok(parsed)
    }
}

/// Drives a headless session through room switches, moves and presets,
/// logging what the scene engine would receive.
pub fn run_walkthrough(args: &DemoArgs) -> Result<()> {
    let policy = if args.strict {
        ParameterPolicy::Strict
    } else {
        ParameterPolicy::Permissive
    };
    let desc = SessionDesc::new()
        .dimension(args.dimension)
        .material(args.material)
        .height_override(args.height)
        .parameter_policy(policy);

    let mut session = RoomSession::new(desc)?;
    session.initialize(MemoryGraph::new(), MemoryScene::new())?;
    log_state(&session, "initialized");

    log::info!("=== Switching rooms ===");
    for dimension in RoomDimensionPreset::ALL {
        session.select_room(dimension.name(), args.material.name())?;
        log_state(&session, dimension.name());
    }
    session.apply_room_preset(RoomPreset::new(args.dimension, args.material))?;

    if let Err(e) = session.select_room(args.dimension.name(), "lava") {
        log::warn!("Rejected room change: {}", e);
    }

    log::info!("=== Moving the listener ===");
    for step in 0..=4 {
        let nx = step as f32 / 4.0;
        session.set_listener_position(Vec2::new(nx, 0.5))?;
        log::info!("listener -> {}", session.listener_position());
    }
    session.set_listener_position(Vec2::new(0.5, 0.5))?;

    log::info!("=== Adjusting controls ===");
    session.set_reverb_delay(0.2)?;
    session.set_general_cutoff(1200.0)?;
    if let Err(e) = session.set_reverb_delay(10.0) {
        log::warn!("Rejected reverb delay: {}", e);
    }
    log::info!("{}", session.controls().stats());

    {
        let mut first = session.source_controls(0)?;
        first.set_manual_gain(0.05)?;
        log::info!(
            "source {} attenuation: {:?}",
            first.index(),
            first.attenuation()
        );
    }

    log::info!("=== Applying preset '{}' ===", args.preset);
    session.apply_preset(args.preset.name())?;
    log::info!("{}", session.controls().stats());
    for channel in session.sources() {
        log::debug!(
            "source {}: {} = {}, reverb {:?}",
            channel.index(),
            ControlParameter::ReverbGain.label(),
            channel.control(ControlParameter::ReverbGain),
            channel.reverb()
        );
    }

    for event in session.poll_events() {
        log::debug!("event: {:?}", event);
    }

    let (graph, scene) = session.shutdown()?;
    log::info!(
        "Shut down with {} graph node(s), {} parameter write(s), {} room update(s)",
        graph.node_count(),
        graph.param_writes(),
        scene.room_updates()
    );
    Ok(())
}

fn log_state(session: &RoomSession<MemoryGraph, MemoryScene>, label: &str) {
    let room = session.room();
    let dims = room.dimensions();
    log::info!(
        "[{}] {} x {} x {} m, floor '{}', {} m3",
        label,
        dims.width,
        dims.height,
        dims.depth,
        room.materials().get(WallFace::Down),
        dims.volume()
    );
    if let Ok(properties) = session.room_properties() {
        log::debug!(
            "[{}] floor reflection coefficient {:.3}",
            label,
            properties.wall(WallFace::Down).reflection_coefficient()
        );
    }
    for (index, position) in session.source_positions().iter().enumerate() {
        log::info!("[{}] source {} at {}", label, index, position);
    }
    log::info!("[{}] listener at {}", label, session.listener_position());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = DemoArgs::parse(&[]).unwrap();
        assert_eq!(parsed.dimension, RoomDimensionPreset::Huge);
        assert_eq!(parsed.material, RoomMaterialPreset::Outside);
        assert_eq!(parsed.preset, BundleName::Faraway);
        assert!(!parsed.strict);
    }

    #[test]
    fn test_parse_flags() {
        let parsed = DemoArgs::parse(&args(&[
            "--dimension",
            "small",
            "--material",
            "marble",
            "--preset",
            "close",
            "--height",
            "1.5",
            "--strict",
        ]))
        .unwrap();
        assert_eq!(parsed.dimension, RoomDimensionPreset::Small);
        assert_eq!(parsed.material, RoomMaterialPreset::Marble);
        assert_eq!(parsed.preset, BundleName::Close);
        assert_eq!(parsed.height, Some(1.5));
        assert!(parsed.strict);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(DemoArgs::parse(&args(&["--material", "lava"])).is_err());
        assert!(DemoArgs::parse(&args(&["--dimension"])).is_err());
        assert!(DemoArgs::parse(&args(&["--volume", "11"])).is_err());
    }

    #[test]
    fn test_walkthrough_runs_headless() {
        run_walkthrough(&DemoArgs::default()).unwrap();
        run_walkthrough(&DemoArgs {
            strict: true,
            height: Some(1.2),
            ..DemoArgs::default()
        })
        .unwrap();
    }
}
