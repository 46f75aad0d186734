use std::cell::Cell;
use std::rc::Rc;

use ambar::prelude::*;
use ambar::Construct;

// --- Fixtures ---

trait InputSource {
    fn axis(&self) -> i8;
}

struct Keyboard;
impl InputSource for Keyboard {
    fn axis(&self) -> i8 {
        1
    }
}

struct PlayerStats {
    health: u32,
}

#[derive(Construct)]
struct PlayerController {
    input: Rc<dyn InputSource>,
    stats: Rc<PlayerStats>,
    #[construct(default)]
    frames: u64,
}

#[derive(Construct)]
struct Pair(Rc<PlayerStats>, Rc<PlayerStats>);

#[derive(Construct)]
struct Marker;

#[derive(Construct)]
struct Slot<T> {
    item: Rc<T>,
}

fn bind_basics(container: &Container) {
    container
        .bind::<dyn InputSource>(Strategy::factory(|| Rc::new(Keyboard) as Rc<dyn InputSource>))
        .unwrap();
    container
        .bind_with::<PlayerStats>(
            Strategy::factory(|| Rc::new(PlayerStats { health: 100 })),
            BindOptions::new().transient(),
        )
        .unwrap();
}

// --- Tests ---

#[test]
fn derived_signature_skips_default_fields() {
    assert_eq!(
        <PlayerController as ambar::Construct>::dependencies(),
        vec![
            DependencyKey::of::<dyn InputSource>(),
            DependencyKey::of::<PlayerStats>(),
        ]
    );
    assert!(<Marker as ambar::Construct>::dependencies().is_empty());
}

#[test]
fn derived_named_struct() {
    let container = Container::new();
    bind_basics(&container);
    container.bind::<PlayerController>(Strategy::construct()).unwrap();

    let controller = container.resolve::<PlayerController>().unwrap();
    assert_eq!(controller.input.axis(), 1);
    assert_eq!(controller.stats.health, 100);
    assert_eq!(controller.frames, 0);
}

#[test]
fn derived_tuple_struct_gets_fresh_transients() {
    let container = Container::new();
    bind_basics(&container);
    container.bind::<Pair>(Strategy::construct()).unwrap();

    let pair = container.resolve::<Pair>().unwrap();
    assert!(!Rc::ptr_eq(&pair.0, &pair.1));
}

#[test]
fn derived_unit_struct() {
    let container = Container::new();
    container.bind::<Marker>(Strategy::construct()).unwrap();
    assert!(container.resolve::<Marker>().is_ok());
}

#[test]
fn derived_generic_struct() {
    let container = Container::new();
    bind_basics(&container);
    container.bind::<Slot<PlayerStats>>(Strategy::construct()).unwrap();

    assert_eq!(
        <Slot<PlayerStats> as ambar::Construct>::dependencies(),
        vec![DependencyKey::of::<PlayerStats>()]
    );
    assert_eq!(container.resolve::<Slot<PlayerStats>>().unwrap().item.health, 100);
}

#[test]
fn non_lazy_constructor_bind() {
    let container = Container::new();
    bind_basics(&container);
    container
        .bind_with::<PlayerController>(Strategy::construct(), BindOptions::new().non_lazy())
        .unwrap();

    assert!(container.is_eagerly_initialized::<PlayerController>());
    let a = container.resolve::<PlayerController>().unwrap();
    let b = container.resolve::<PlayerController>().unwrap();
    assert!(Rc::ptr_eq(&a, &b));
}

#[test]
fn singleton_over_transient_dependency() {
    // One controller ever exists; a fresh stats object is built each
    // time a controller is freshly built.
    let built = Rc::new(Cell::new(0));
    let container = Container::new();
    container
        .bind::<dyn InputSource>(Strategy::instance(Rc::new(Keyboard) as Rc<dyn InputSource>))
        .unwrap();
    container
        .bind_with::<PlayerStats>(
            Strategy::factory({
                let built = built.clone();
                move || {
                    built.set(built.get() + 1);
                    Rc::new(PlayerStats { health: 50 })
                }
            }),
            BindOptions::new().transient(),
        )
        .unwrap();
    container.bind::<PlayerController>(Strategy::construct()).unwrap();

    let a = container.resolve::<PlayerController>().unwrap();
    let b = container.resolve::<PlayerController>().unwrap();
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(built.get(), 1);

    let loose_a = container.resolve::<PlayerStats>().unwrap();
    assert!(!Rc::ptr_eq(&loose_a, &a.stats));
    assert_eq!(built.get(), 2);

    // Transient owner: each build pulls its own stats.
    container
        .bind_with::<PlayerController>(Strategy::construct(), BindOptions::new().transient())
        .unwrap();
    let c = container.resolve::<PlayerController>().unwrap();
    let d = container.resolve::<PlayerController>().unwrap();
    assert!(!Rc::ptr_eq(&c.stats, &d.stats));
    assert_eq!(built.get(), 4);
}

#[test]
fn cycle_between_constructed_types() {
    #[derive(Construct)]
    struct Left {
        _right: Rc<Right>,
    }

    #[derive(Construct)]
    struct Right {
        _left: Rc<Left>,
    }

    let container = Container::new();
    container.bind::<Left>(Strategy::construct()).unwrap();
    container.bind::<Right>(Strategy::construct()).unwrap();

    assert!(matches!(
        container.validate(),
        Err(AmbarError::CircularDependency(_))
    ));

    match container.resolve::<Left>().map(|_| ()) {
        Err(AmbarError::CircularDependency(err)) => {
            let names: Vec<String> = err.chain.iter().map(DependencyKey::short_name).collect();
            assert_eq!(names, ["Left", "Right", "Left"]);
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
}

#[test]
fn validate_passes_for_complete_graph() {
    let container = Container::new();
    bind_basics(&container);
    container.bind::<PlayerController>(Strategy::construct()).unwrap();
    assert!(container.validate().is_ok());
}

#[test]
fn validate_reports_missing_parameter() {
    let container = Container::new();
    container.bind::<PlayerController>(Strategy::construct()).unwrap();

    match container.validate() {
        Err(AmbarError::NotRegistered(err)) => {
            assert_eq!(err.required_by, Some(DependencyKey::of::<PlayerController>()));
        }
        other => panic!("expected NotRegistered, got {other:?}"),
    }
}
