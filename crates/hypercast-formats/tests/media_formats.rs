//! Song and album documents in every supported media format.

use assert_json_diff::assert_json_eq;
use hypercast_core::prelude::*;
use hypercast_formats::{
	Codec, CollectionJsonCodec, CollectionJsonOptions, Format, HalCodec, JsonCodec, QueryTemplate,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn song(title: &str) -> ObjectRef {
	Record::new().with("title", title).into_ref()
}

#[fixture]
fn registry() -> SchemaRegistry {
	SchemaRegistry::new()
}

#[fixture]
fn hal_album() -> Schema {
	Schema::new(
		"album",
		vec![
			FieldBinding::property("title"),
			FieldBinding::collection("songs")
				.nested(
					Schema::builder("song")
						.property("title")
						.link("self", |s| Ok(format!("http://songs/{}", s.string("title")?)))
						.build()
						.unwrap(),
				)
				.embedded(),
		],
	)
	.unwrap()
}

#[fixture]
fn true_north() -> ObjectRef {
	Record::new()
		.with("title", "True North")
		.with(
			"songs",
			AttrValue::list([song("The Island"), song("Changing Tide")]),
		)
		.into_ref()
}

fn encode(codec: &dyn Codec, object: &ObjectRef, schema: &Schema, registry: &SchemaRegistry) -> Value {
	let node = Serializer::new(registry).serialize(object, schema).unwrap().node;
	codec.encode(&node, schema, registry).unwrap()
}

#[rstest]
fn test_hal_embeds_songs(registry: SchemaRegistry, hal_album: Schema, true_north: ObjectRef) {
	let value = encode(&HalCodec::new(), &true_north, &hal_album, &registry);

	assert_json_eq!(
		value,
		json!({
			"title": "True North",
			"_embedded": {
				"songs": [
					{"title": "The Island", "_links": {"self": {"href": "http://songs/The Island"}}},
					{"title": "Changing Tide", "_links": {"self": {"href": "http://songs/Changing Tide"}}}
				]
			}
		})
	);
}

#[rstest]
fn test_hal_round_trip(registry: SchemaRegistry, hal_album: Schema, true_north: ObjectRef) {
	let codec = HalCodec::new();
	let text = codec
		.to_string(
			&Serializer::new(&registry)
				.serialize(&true_north, &hal_album)
				.unwrap()
				.node,
			&hal_album,
			&registry,
		)
		.unwrap();

	let node = codec.from_str(&text, &hal_album, &registry).unwrap();
	let album = Deserializer::new(&registry)
		.deserialize(&node, &hal_album, &RecordFactory)
		.unwrap();

	let songs = album.read().get("songs").unwrap().objects();
	assert_eq!(songs.len(), 2);
	let first = songs[0].read();
	assert_eq!(first.string("title").unwrap(), "The Island");
	assert_eq!(first.links().unwrap()["self"].href, "http://songs/The Island");
}

#[rstest]
fn test_json_keeps_links_list(registry: SchemaRegistry, hal_album: Schema, true_north: ObjectRef) {
	let value = encode(&JsonCodec::new(), &true_north, &hal_album, &registry);

	assert_json_eq!(
		value["songs"][1],
		json!({
			"title": "Changing Tide",
			"links": [{"rel": "self", "href": "http://songs/Changing Tide"}]
		})
	);
}

#[rstest]
fn test_collection_json_song(registry: SchemaRegistry) {
	let schema = Schema::builder("song")
		.binding(FieldBinding::property("title").prompt("Song title"))
		.link("self", |s| Ok(format!("//songs/{}", s.string("title")?)))
		.link("download", |s| Ok(format!("//songs/{}.mp3", s.string("title")?)))
		.build()
		.unwrap();
	let codec = CollectionJsonCodec::new(CollectionJsonOptions {
		href: Some("http://localhost/songs/".to_string()),
		..Default::default()
	})
	.query(QueryTemplate::new("search", "//search").param("q", ""));

	let value = encode(&codec, &song("Roxanne"), &schema, &registry);

	assert_json_eq!(
		value,
		json!({
			"collection": {
				"version": "1.0",
				"href": "http://localhost/songs/",
				"items": [{
					"href": "//songs/Roxanne",
					"data": [{"name": "title", "value": "Roxanne", "prompt": "Song title"}],
					"links": [{"rel": "download", "href": "//songs/Roxanne.mp3"}]
				}],
				"queries": [{
					"rel": "search",
					"href": "//search",
					"data": [{"name": "q", "value": ""}]
				}],
				"template": {"data": [{"name": "title", "value": "", "prompt": "Song title"}]}
			}
		})
	);
}

#[rstest]
fn test_collection_json_items_decode(registry: SchemaRegistry) {
	let schema = Schema::builder("song")
		.property("title")
		.link("self", |s| Ok(format!("//songs/{}", s.string("title")?)))
		.build()
		.unwrap();
	let songs = vec![song("Fate"), song("Roxanne")];
	let node = Serializer::new(&registry)
		.serialize_collection(&songs, &schema)
		.unwrap()
		.node;
	let codec = Format::CollectionJson.codec();

	let text = codec.to_string(&node, &schema, &registry).unwrap();
	let decoded = codec.from_str(&text, &schema, &registry).unwrap();

	assert_eq!(decoded, node);
}

#[rstest]
#[case(Format::Json, "application/json")]
#[case(Format::Hal, "application/hal+json")]
#[case(Format::CollectionJson, "application/vnd.collection+json")]
fn test_codec_media_types(#[case] format: Format, #[case] media_type: &str) {
	assert_eq!(format.codec().media_type(), media_type);
	assert_eq!(Format::from_media_type(media_type).unwrap(), format);
}
