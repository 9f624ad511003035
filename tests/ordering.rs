
use engine_::{init_tracing, Engine, Host, Lcg};
use stage_host::{error::OrderViolation, load::load_children, Element, Error, HostConfig, NodeId, Props, Reconciler, Scene, SceneGraph, Value};

/// Reference order: "insert before" means "detach, then take the anchor's position".
fn model_insert_before(model: &mut Vec<NodeId>, child: NodeId, before: NodeId) {
	model.retain(|&node| node != child);
	let index = model.iter().position(|&node| node == before).unwrap();
	model.insert(index, child);
}

#[test]
fn random_mutations_match_the_reference_order() {
	init_tracing();

	for seed in 0..64 {
		let mut rng = Lcg(seed);
		let mut host = Host::new(Scene::new());
		let stage = host.create_container(&Props::new());
		let layer = host.create_instance("Layer", &Props::new(), stage, &()).unwrap();
		host.append_child_to_container(stage, layer);

		let mut model = Vec::new();
		for _ in 0..60 {
			match rng.below(if model.len() < 2 { 2 } else { 5 }) {
				0 => {
					let node = host.create_instance("Rect", &Props::new(), stage, &()).unwrap();
					host.append_child(layer, node);
					model.push(node);
				}
				1 if !model.is_empty() => {
					let node = host.create_instance("Circle", &Props::new(), stage, &()).unwrap();
					let before = model[rng.below(model.len())];
					host.insert_before(layer, node, before).unwrap();
					model_insert_before(&mut model, node, before);
				}
				1 => {}
				2 => {
					let node = model[rng.below(model.len())];
					host.append_child(layer, node);
					model.retain(|&other| other != node);
					model.push(node);
				}
				3 => {
					let child = model[rng.below(model.len())];
					let before = model[rng.below(model.len())];
					if child == before {
						let error = host.insert_before(layer, child, before).unwrap_err();
						assert!(matches!(error, Error::InvalidOrder { violation: OrderViolation::BeforeItself, .. }));
					} else {
						host.insert_before(layer, child, before).unwrap();
						model_insert_before(&mut model, child, before);
					}
				}
				_ => {
					let node = model.remove(rng.below(model.len()));
					host.remove_child(layer, node);
				}
			}
			assert_eq!(host.scene().children(layer), model.as_slice(), "seed {}", seed);
		}
		host.reset_after_commit(stage);
	}
}

fn keyed(keys: &[u32]) -> Vec<Element> {
	vec![Element::new("Layer").key("layer").children(
		keys.iter()
			.map(|key| Element::new("Rect").key(key.to_string()).prop("name", key.to_string())),
	)]
}

fn names(host: &Host, layer: NodeId) -> Vec<String> {
	load_children(host.scene(), layer)
		.iter()
		.map(|element| match element.get_props().and_then(|props| props.get("name")) {
			Some(Value::String(name)) => name.clone(),
			other => panic!("unexpected name {:?}", other),
		})
		.collect()
}

#[test]
fn keyed_reorders_keep_identity() {
	init_tracing();

	let mut rng = Lcg(7);
	let mut host = Host::new(Scene::new());
	let mut engine = Engine::default();
	let container = host.create_container(&Props::new());
	let mut root = engine.create_container(&mut host, container);

	let mut keys: Vec<u32> = (0..8).collect();
	engine.update_container(&mut host, &mut root, &keyed(&keys)).unwrap();
	let layer = root.get(&["layer"]).unwrap();

	let mut next_key = 8;
	for _ in 0..40 {
		let before: Vec<(u32, NodeId)> = keys
			.iter()
			.map(|key| (*key, root.get(&["layer", key.to_string().as_str()]).unwrap()))
			.collect();

		rng.shuffle(&mut keys);
		if rng.below(3) == 0 && !keys.is_empty() {
			keys.remove(rng.below(keys.len()));
		}
		if rng.below(3) == 0 {
			let at = rng.below(keys.len() + 1);
			keys.insert(at, next_key);
			next_key += 1;
		}

		engine.update_container(&mut host, &mut root, &keyed(&keys)).unwrap();

		let expected: Vec<String> = keys.iter().map(ToString::to_string).collect();
		assert_eq!(names(&host, layer), expected);
		for (key, node) in before {
			if keys.contains(&key) {
				assert_eq!(root.get(&["layer", key.to_string().as_str()]), Some(node));
			} else {
				assert!(!host.scene().contains(node));
			}
		}
	}
}

#[test]
fn anchors_must_be_siblings() {
	init_tracing();

	let mut host = Host::new(Scene::new());
	let stage = host.create_container(&Props::new());
	let first = host.create_instance("Layer", &Props::new(), stage, &()).unwrap();
	let second = host.create_instance("FastLayer", &Props::new(), stage, &()).unwrap();
	let shape = host.create_instance("Wedge", &Props::new(), stage, &()).unwrap();
	host.append_child_to_container(stage, first);
	host.append_child_to_container(stage, second);
	host.append_child(first, shape);

	let error = host.insert_in_container_before(stage, second, shape).unwrap_err();
	assert!(matches!(error, Error::InvalidOrder { violation: OrderViolation::NotASibling, .. }));
	assert_eq!(host.scene().children(stage), &[first, second]);

	host.insert_in_container_before(stage, second, first).unwrap();
	assert_eq!(host.scene().children(stage), &[second, first]);
}
