//! Site integration tests
//!
//! Loads settings from a project directory and renders full pages through
//! the facade crate.

use rstest::*;
use serde_json::json;
use slys::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, content).unwrap();
}

#[fixture]
fn project() -> TempDir {
	let temp_dir = TempDir::new().unwrap();
	let root = temp_dir.path();

	write(
		root,
		"config.toml",
		r#"
default_layout = "main"
language = "en"

[layouts.main.placeholders]
menu = { module = "index", controller = "menu", action = "index" }
"#,
	);
	write(root, "local-config.toml", "language = \"fr\"\n");
	write(
		root,
		"layouts/main.html",
		"<nav>{{ placeholders.menu | safe }}</nav>{{ content | safe }}",
	);
	write(
		root,
		"modules/index/views/menu/index.html",
		"<a href=\"{{ url(controller=\"cart\") | safe }}\">{{ label }}</a>",
	);
	write(root, "modules/shop/views/cart/index.html", "<p>{{ count }}</p>");
	write(root, "lang/fr.toml", "cart = \"Panier\"\n");

	temp_dir
}

#[rstest]
fn test_page_from_project_directory(project: TempDir) {
	let settings = load_from_dir(project.path()).unwrap();
	assert_eq!(settings.language, "fr");

	let app = ApplicationBuilder::new(settings)
		.action("index", "menu", "index", |cx| {
			let label = cx.translate("cart");
			cx.assign("label", label);
			Ok(())
		})
		.action("shop", "cart", "index", |_| Ok(json!({ "count": 2 })))
		.build()
		.unwrap();

	let rendered = app
		.run(Request::route("/shop/cart", Method::GET, Vec::<(String, String)>::new()))
		.unwrap();

	assert_eq!(
		rendered,
		Rendered::Html("<nav><a href=\"/index/cart/\">Panier</a></nav><p>2</p>".to_string())
	);
}
