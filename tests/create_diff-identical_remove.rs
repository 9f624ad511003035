
use engine_::{init_tracing, Engine, Host};
use stage_host::{load::load_children, Element, Error, Handler, Reconciler, Scene, SceneGraph};

fn scene() -> Vec<Element> {
	vec![Element::new("Layer").children([
		Element::new("Rect").prop("x", 1).prop("y", 2).prop("fill", "red"),
		Element::new("Text").prop("text", "score").prop("fontSize", 12),
		Element::new("Group").child(Element::new("RegularPolygon").prop("sides", 6).prop("radius", 3)),
	])]
}

#[test]
fn create_diff_identical_remove() {
	init_tracing();

	let mut host = Host::new(Scene::new());
	let mut engine = Engine::default();
	let container = host.create_container(&Default::default());
	let mut root = engine.create_container(&mut host, container);

	let tree = scene();
	engine.update_container(&mut host, &mut root, &tree).unwrap();
	assert_eq!(load_children(host.scene(), container), tree);

	let draws = host.scene().total_draws();
	engine.update_container(&mut host, &mut root, &scene()).unwrap();
	assert_eq!(host.scene().total_draws(), draws);
	assert_eq!(host.pending_repaints(), 0);

	engine.update_container(&mut host, &mut root, &[]).unwrap();
	assert!(host.scene().children(container).is_empty());
	assert_eq!(host.scene().len(), 1);
}

#[test]
fn identical_handlers_by_identity() {
	init_tracing();

	let mut host = Host::new(Scene::new());
	let mut engine = Engine::default();
	let container = host.create_container(&Default::default());
	let mut root = engine.create_container(&mut host, container);

	let handler = Handler::new(|_| ());
	let tree = |handler: Handler| [Element::new("Layer").child(Element::new("Arrow").prop("onClick", handler))];

	engine.update_container(&mut host, &mut root, &tree(handler.clone())).unwrap();
	let draws = host.scene().total_draws();
	engine.update_container(&mut host, &mut root, &tree(handler)).unwrap();
	engine.update_container(&mut host, &mut root, &tree(Handler::new(|_| ()))).unwrap();

	// Handler changes don't repaint.
	assert_eq!(host.scene().total_draws(), draws);
	assert_eq!(host.listeners().total(), 1);
}

#[test]
fn rejections() {
	init_tracing();

	let mut host = Host::new(Scene::new());
	let mut engine = Engine::default();
	let container = host.create_container(&Default::default());
	let mut root = engine.create_container(&mut host, container);

	let error = engine
		.update_container(&mut host, &mut root, &[Element::new("Layer").child(Element::new("Foo"))])
		.unwrap_err();
	assert!(matches!(error, Error::UnsupportedType { tag } if tag == "Foo"));

	let error = engine
		.update_container(&mut host, &mut root, &[Element::new("Layer").child(Element::text("loose text"))])
		.unwrap_err();
	assert!(matches!(error, Error::UnsupportedTextChild { text } if text == "loose text"));

	let error = engine
		.update_container(&mut host, &mut root, &[Element::new("Stage")])
		.unwrap_err();
	assert!(matches!(error, Error::UnsupportedType { .. }));
}
