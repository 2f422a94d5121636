//! Property-based round-trip tests
//!
//! For schemas made of scalar bindings, deserializing a serialized object
//! yields an equal object.

use hypercast_core::prelude::*;
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Scalar> {
	prop_oneof![
		Just(Scalar::Null),
		any::<bool>().prop_map(Scalar::Bool),
		any::<i64>().prop_map(Scalar::Int),
		(-1.0e12f64..1.0e12f64).prop_map(Scalar::Float),
		"[ -~]{0,24}".prop_map(Scalar::String),
	]
}

fn record_of(values: &[Scalar]) -> Record {
	values
		.iter()
		.enumerate()
		.fold(Record::new(), |record, (i, value)| {
			record.with(format!("field{}", i), value.clone())
		})
}

fn schema_for(len: usize) -> Schema {
	(0..len)
		.fold(Schema::builder("scalars"), |builder, i| {
			builder.property(format!("field{}", i))
		})
		.build()
		.unwrap()
}

proptest! {
	/// Scalar-only objects survive serialize then deserialize unchanged.
	#[test]
	fn prop_scalar_round_trip(values in prop::collection::vec(scalar(), 1..8)) {
		let registry = SchemaRegistry::new();
		let schema = schema_for(values.len());
		let original = record_of(&values);

		let out = Serializer::new(&registry)
			.serialize(&original.clone().into_ref(), &schema)
			.unwrap();
		let parsed = Deserializer::new(&registry)
			.deserialize(&out.node, &schema, &TypedFactory::<Record>::new())
			.unwrap();

		for (i, value) in values.iter().enumerate() {
			let name = format!("field{}", i);
			prop_assert_eq!(parsed.read().get(&name), Some(AttrValue::Scalar(value.clone())));
		}
		prop_assert!(out.warnings.is_empty());
	}

	/// Scalar collections keep their element order.
	#[test]
	fn prop_collection_order(items in prop::collection::vec("[a-z]{1,12}", 0..16)) {
		let registry = SchemaRegistry::new();
		let schema = Schema::builder("song").collection("composers").build().unwrap();
		let song = Record::new()
			.with("composers", AttrValue::list(items.iter().map(String::as_str)))
			.into_ref();

		let out = Serializer::new(&registry).serialize(&song, &schema).unwrap();
		let rendered: Vec<&str> = out
			.node
			.get("composers")
			.and_then(Node::as_sequence)
			.unwrap()
			.iter()
			.filter_map(Node::as_str)
			.collect();

		prop_assert_eq!(rendered, items.iter().map(String::as_str).collect::<Vec<_>>());
	}
}
