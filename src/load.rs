//! Reading live scene subtrees back into declarative descriptors.
//!
//! Only attributes are captured. Listeners and keys aren't part of the scene's observable state.

use crate::{element::Element, scene::SceneGraph};

pub fn load_node<S: SceneGraph>(scene: &S, node: S::Node) -> Element {
	Element::new(scene.kind(node).tag())
		.props(scene.attrs(node))
		.children(load_children(scene, node))
}

pub fn load_children<S: SceneGraph>(scene: &S, parent: S::Node) -> Vec<Element> {
	scene.children(parent).iter().map(|&child| load_node(scene, child)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		kind::NodeKind,
		props::{Handler, Props},
		scene::Scene,
	};

	#[test]
	fn snapshot() {
		let mut scene = Scene::new();
		let layer = scene.create_node(NodeKind::Layer);
		let rect = scene.create_node(NodeKind::Rect);
		let text = scene.create_node(NodeKind::Text);
		scene.add(layer, rect);
		scene.add(layer, text);
		scene.set_attrs(rect, Props::new().with("x", 1));
		scene.set_attr(text, "text", Some("hi".into()));
		scene.on(rect, "click.bridge", Handler::new(|_| ()));

		assert_eq!(
			load_node(&scene, layer),
			Element::new("Layer").children([
				Element::new("Rect").prop("x", 1),
				Element::new("Text").prop("text", "hi"),
			])
		);
	}
}
