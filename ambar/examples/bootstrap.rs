//! Wiring a small game scene through installers.
//!
//! Run with `RUST_LOG=ambar_container=trace` to watch bindings and
//! resolutions.

use std::rc::Rc;

use ambar::prelude::*;
use ambar::Construct;
use tracing::info;
use tracing_subscriber::EnvFilter;

trait InputSource {
    fn describe(&self) -> &'static str;
}

struct Gamepad;

impl InputSource for Gamepad {
    fn describe(&self) -> &'static str {
        "gamepad"
    }
}

struct Settings {
    sensitivity: f32,
}

struct Crosshair;

#[derive(Construct)]
struct PlayerController {
    input: Rc<dyn InputSource>,
    settings: Rc<Settings>,
    crosshair: Rc<Crosshair>,
}

struct CoreInstaller;

impl Installer for CoreInstaller {
    fn install_bindings(&self, container: &Container) -> Result<()> {
        container.bind::<Settings>(Strategy::instance(Rc::new(Settings { sensitivity: 0.8 })))?;
        container.bind_with::<dyn InputSource>(
            Strategy::factory(|| Rc::new(Gamepad) as Rc<dyn InputSource>),
            BindOptions::new().transient(),
        )?;
        container.bind::<Crosshair>(Strategy::template(
            Prefab::new("CrosshairPrefab").with(|| Rc::new(Crosshair)),
        ))
    }
}

struct GameInstaller;

impl Installer for GameInstaller {
    fn install_bindings(&self, container: &Container) -> Result<()> {
        container.bind_with::<PlayerController>(Strategy::construct(), BindOptions::new().non_lazy())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ambar_container=debug")),
        )
        .init();

    let container = Container::new();
    container.install_all([&CoreInstaller as &dyn Installer, &GameInstaller])?;
    container.validate()?;
    info!(?container, "Scene wired");

    let player = container.resolve::<PlayerController>()?;
    println!(
        "player uses {} at sensitivity {} (crosshair shared: {})",
        player.input.describe(),
        player.settings.sensitivity,
        Rc::ptr_eq(&player.crosshair, &container.resolve::<Crosshair>()?),
    );

    match container.resolve::<String>() {
        Err(err) => println!("as expected:\n{err}"),
        Ok(value) => println!("unexpected binding: {value}"),
    }

    Ok(())
}
