//! Song and album representers, end to end through the core engine.

use hypercast_core::prelude::*;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn to_json(node: &Node) -> Value {
	Value::from(node)
}

fn title_of(object: &ObjectRef) -> Option<String> {
	object.read().string("title").ok()
}

fn songs_of(album: &ObjectRef) -> Vec<ObjectRef> {
	album
		.read()
		.get("songs")
		.map(|songs| songs.objects())
		.unwrap_or_default()
}

fn song(title: &str) -> ObjectRef {
	Record::new().with("title", title).into_ref()
}

fn album(title: &str, songs: &[&str]) -> ObjectRef {
	Record::new()
		.with("title", title)
		.with("songs", AttrValue::list(songs.iter().map(|t| song(t))))
		.into_ref()
}

#[fixture]
fn registry() -> SchemaRegistry {
	let registry = SchemaRegistry::new();
	registry
		.register(
			"song",
			vec![FieldBinding::property("title"), FieldBinding::collection("composers")],
		)
		.unwrap();
	registry
}

#[rstest]
fn test_song_title_round_trip() {
	let registry = SchemaRegistry::new();
	let schema = Schema::builder("song").property("title").build().unwrap();

	let out = Serializer::new(&registry)
		.serialize(&song("Fate"), &schema)
		.unwrap();
	assert_eq!(to_json(&out.node), json!({"title": "Fate"}));

	let parsed = Deserializer::new(&registry)
		.deserialize(&Node::from(json!({"title": "Linoleum"})), &schema, &RecordFactory)
		.unwrap();
	assert_eq!(title_of(&parsed), Some("Linoleum".to_string()));
}

#[rstest]
fn test_scalar_collection(registry: SchemaRegistry) {
	let schema = registry.resolve("song").unwrap();
	let roxanne = Record::new()
		.with("title", "Roxanne")
		.with("composers", AttrValue::list(["Sting", "Stu Copeland"]))
		.into_ref();

	let out = Serializer::new(&registry).serialize(&roxanne, &schema).unwrap();

	assert_eq!(
		to_json(&out.node),
		json!({"title": "Roxanne", "composers": ["Sting", "Stu Copeland"]})
	);
}

#[rstest]
fn test_nested_by_registered_id(registry: SchemaRegistry) {
	let schema = Schema::new(
		"album",
		vec![
			FieldBinding::property("title"),
			FieldBinding::collection("songs")
				.nested_id("song")
				.factory_of::<Record>(),
		],
	)
	.unwrap();
	// The album songs carry no composers, so publish a title-only version
	let version = registry
		.replace("song", vec![FieldBinding::property("title")])
		.unwrap();
	assert_eq!(version, 2);

	let out = Serializer::new(&registry)
		.serialize(&album("True North", &["The Island", "Changing Tide"]), &schema)
		.unwrap();

	assert_eq!(
		to_json(&out.node),
		json!({
			"title": "True North",
			"songs": [{"title": "The Island"}, {"title": "Changing Tide"}]
		})
	);
}

#[rstest]
fn test_inline_nested_round_trip_keeps_order() {
	let registry = SchemaRegistry::new();
	let schema = Schema::builder("album")
		.property("title")
		.inline_collection("songs", |song| song.property("title"))
		.build()
		.unwrap();
	let document =
		json!({"title":"True North","songs":[{"title":"The Island"},{"title":"Changing Tide"}]});

	let parsed = Deserializer::new(&registry)
		.deserialize(&Node::from(document.clone()), &schema, &RecordFactory)
		.unwrap();
	assert_eq!(title_of(&parsed), Some("True North".to_string()));
	assert_eq!(
		songs_of(&parsed).iter().filter_map(title_of).collect::<Vec<_>>(),
		vec!["The Island", "Changing Tide"]
	);

	let out = Serializer::new(&registry).serialize(&parsed, &schema).unwrap();
	assert_eq!(to_json(&out.node), document);
}

#[rstest]
fn test_sync_updates_songs_in_place() {
	let registry = SchemaRegistry::new();
	let schema = Schema::new(
		"album",
		vec![
			FieldBinding::property("title"),
			FieldBinding::collection("songs")
				.nested(Schema::builder("song").property("title").build().unwrap())
				.sync(),
		],
	)
	.unwrap();
	let album = album("True North", &["The Island", "Changing Tide"]);
	let first = songs_of(&album)[0].clone();

	Deserializer::new(&registry)
		.deserialize_into(
			&Node::from(json!({
				"title": "True North",
				"songs": [{"title": "Secret Society"}, {"title": "Changing Tide"}]
			})),
			&schema,
			&album,
			&RecordFactory,
		)
		.unwrap();

	let songs = songs_of(&album);
	assert!(same_object(&songs[0], &first));
	assert_eq!(title_of(&first), Some("Secret Society".to_string()));
}

#[rstest]
fn test_hypermedia_round_trip() {
	let registry = SchemaRegistry::new();
	let schema = Schema::builder("song")
		.property("title")
		.link("self", |song| Ok(format!("http://songs/{}", song.string("title")?)))
		.build()
		.unwrap();

	let out = Serializer::new(&registry)
		.serialize(&song("Roxanne"), &schema)
		.unwrap();
	assert_eq!(
		to_json(&out.node),
		json!({"title": "Roxanne", "links": [{"rel": "self", "href": "http://songs/Roxanne"}]})
	);

	let parsed = Deserializer::new(&registry)
		.deserialize(&out.node, &schema, &RecordFactory)
		.unwrap();
	let guard = parsed.read();
	assert_eq!(guard.links().unwrap()["self"].href, "http://songs/Roxanne");
}

#[rstest]
fn test_unknown_schema_never_defaults() {
	let registry = SchemaRegistry::new();
	assert_eq!(
		registry.resolve("song").unwrap_err(),
		SchemaError::UnknownSchema("song".to_string())
	);
}
