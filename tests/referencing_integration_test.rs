use approx::assert_relative_eq;
use projbind::units::{DEGREE, METRE};
use projbind::{
    AuthorityFactory, ComparisonCriterion, CompiledTransform, Context, Convention, Error, ObjectFactory,
    ObjectProperties, ObjectType, OperationSearch, Parameter, ParameterKind, ReferencingFormat,
    UnitOfMeasure, UnitType,
};

fn epsg_factory(context: &Context) -> AuthorityFactory {
    AuthorityFactory::new(context, "EPSG").expect("EPSG factory")
}

#[test]
fn epsg_4326_has_its_authority_shape() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    let wgs84 = factory.create_object(ObjectType::GeographicCrs, "4326").expect("EPSG:4326");

    assert_eq!(wgs84.kind(), ObjectType::GeographicCrs);
    assert_eq!(wgs84.name_string().expect("name"), Some(String::from("WGS 84")));
    assert_eq!(wgs84.axis_count().expect("axis count"), 2);

    let latitude = wgs84.axis(0).expect("first axis");
    assert_eq!(latitude.abbreviation, "Lat");
    assert_eq!(latitude.direction, "north");
    assert_eq!(latitude.unit.name, "degree");
    let longitude = wgs84.axis(1).expect("second axis");
    assert_eq!(longitude.abbreviation, "Lon");
    assert_eq!(longitude.direction, "east");

    let mut format = ReferencingFormat::new(&context, Convention::Wkt2_2019);
    let wkt = format.format(&wgs84).expect("WKT export");
    assert!(wkt.starts_with("GEOGCRS["));
    assert!(wkt.contains("ID[\"EPSG\",4326]"), "no authority id in: {wkt}");
}

#[test]
fn unknown_codes_are_structured_errors() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    match factory.create_object(ObjectType::Crs, "-52") {
        Err(Error::NoSuchAuthorityCode { authority, code }) => {
            assert_eq!(authority, "EPSG");
            assert_eq!(code, "-52");
        }
        other => panic!("expected a no-such-code error, got {other:?}"),
    }
}

#[test_log::test]
fn operation_search_produces_a_mercator_pipeline() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    let source = factory.create_object(ObjectType::Crs, "4326").expect("source");
    let target = factory.create_object(ObjectType::Crs, "3395").expect("target");

    let candidates = factory
        .find_operations(&source, &target, &OperationSearch::default())
        .expect("operation search");
    assert!(!candidates.is_empty());

    let mut format = ReferencingFormat::new(&context, Convention::Proj5);
    let pipeline = format.format(&candidates[0]).expect("PROJ string");
    assert!(pipeline.contains("proj=merc"), "unexpected pipeline: {pipeline}");
}

#[test_log::test]
fn four_city_buffer_transforms_in_place() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    let source = factory.create_object(ObjectType::Crs, "4326").expect("source");
    let target = factory.create_object(ObjectType::Crs, "3395").expect("target");
    let operation = factory
        .create_operation(&source, &target, &OperationSearch::default())
        .expect("operation");

    let transform = CompiledTransform::new(&context, &operation).expect("pipeline");
    // Montreal, Vancouver, Tokyo, Paris as (latitude, longitude) tuples
    let mut coordinates = [
        45.5, -73.567, //
        49.25, -123.1, //
        35.653, 139.839, //
        48.865, 2.349,
    ];
    transform.transform(2, &mut coordinates, 0, 4).expect("transform");

    let expected = [
        -8189440.979188756,
        5670093.955753908,
        -13703429.316651976,
        6285000.336330021,
        15566806.273040581,
        4228072.862627759,
        261489.48387339964,
        6219786.635585431,
    ];
    for (value, expected) in coordinates.iter().zip(expected) {
        assert_relative_eq!(*value, expected, epsilon = 0.01);
    }
}

#[test]
fn parameter_accessors_guard_their_kind() {
    let parameter = Parameter {
        name: String::from("Latitude difference file"),
        authority: None,
        code: None,
        kind: ParameterKind::Filename,
        numeric_value: f64::NAN,
        text_value: Some(String::from("conus")),
        unit: None,
    };

    assert_eq!(parameter.file_value().expect("file value"), "conus");
    match parameter.int_value() {
        Err(Error::InvalidParameterType { name, requested }) => {
            assert_eq!(name, "Latitude difference file");
            assert_eq!(requested, ParameterKind::Integer);
        }
        other => panic!("expected a parameter type error, got {other:?}"),
    }
}

#[test]
fn one_code_resolves_to_one_wrapper() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    let first = factory.create_object(ObjectType::GeographicCrs, "4326").expect("lookup");
    let second = factory.create_object(ObjectType::GeographicCrs, "4326").expect("lookup");
    assert!(first.same_wrapper(&second));
    assert_eq!(first.raw_address(), second.raw_address());
}

#[test]
fn releases_and_closes_are_absorbed() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    let crs = factory.create_object(ObjectType::Crs, "4326").expect("lookup");

    crs.release();
    crs.release();
    assert!(matches!(crs.name_string(), Err(Error::NullHandle)));
    // the resolved kind survives the native release
    assert_eq!(crs.kind(), ObjectType::GeographicCrs);

    context.close();
    context.close();
    assert!(context.is_closed());
    assert!(matches!(
        factory.create_object(ObjectType::Crs, "4326"),
        Err(Error::NullHandle)
    ));
}

#[test_log::test]
fn a_built_crs_matches_its_authority_twin() {
    let context = Context::new().expect("context creation");
    let object_factory = ObjectFactory::new(&context);
    let authority_factory = epsg_factory(&context);

    let ellipsoid = object_factory
        .create(
            ObjectType::Ellipsoid,
            &ObjectProperties::named("WGS 84"),
            &[],
            &[],
            &[6378137.0, 0.0, 298.257223563],
            METRE,
        )
        .expect("ellipsoid");
    let greenwich = object_factory
        .create(
            ObjectType::PrimeMeridian,
            &ObjectProperties::named("Greenwich"),
            &[],
            &[],
            &[0.0],
            DEGREE,
        )
        .expect("prime meridian");
    let datum = object_factory
        .create(
            ObjectType::GeodeticReferenceFrame,
            &ObjectProperties::named("World Geodetic System 1984"),
            &[&ellipsoid, &greenwich],
            &[],
            &[],
            0,
        )
        .expect("datum");

    let latitude = object_factory
        .create_axis("Geodetic latitude", "Lat", "north", DEGREE)
        .expect("latitude axis");
    let longitude = object_factory
        .create_axis("Geodetic longitude", "Lon", "east", DEGREE)
        .expect("longitude axis");
    let cs = object_factory
        .create(
            ObjectType::EllipsoidalCs,
            &ObjectProperties::default(),
            &[],
            &[latitude, longitude],
            &[],
            0,
        )
        .expect("coordinate system");

    let crs = object_factory
        .create(
            ObjectType::GeographicCrs,
            &ObjectProperties::named("WGS 84"),
            &[&datum, &cs],
            &[],
            &[],
            0,
        )
        .expect("geographic CRS");

    let wgs84 = authority_factory
        .create_object(ObjectType::GeographicCrs, "4326")
        .expect("EPSG:4326");
    assert!(crs
        .is_equivalent_to(&wgs84, ComparisonCriterion::EquivalentExceptAxisOrder)
        .expect("comparison"));
}

#[test]
fn parse_warnings_reset_between_calls() {
    let context = Context::new().expect("context creation");
    let mut format = ReferencingFormat::new(&context, Convention::WKT);

    // WKT1 requires a UNIT in GEOGCS, leaving it out is a recoverable defect
    let crs = format
        .parse(
            "GEOGCS[\"lenient\",DATUM[\"North_American_Datum_1927\",\
             SPHEROID[\"Clarke 1866\",6378206.4,294.978698213898]],PRIMEM[\"Greenwich\",0]]",
        )
        .expect("lenient parse");
    assert!(crs.kind().is_crs());
    assert!(!format.warnings().is_empty());

    format.parse("EPSG:4326").expect("clean parse");
    assert!(format.warnings().is_empty());
}

#[test]
fn axis_indexes_are_bounded() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    let wgs84 = factory.create_object(ObjectType::GeographicCrs, "4326").expect("EPSG:4326");

    match wgs84.axis(5) {
        Err(Error::OutOfBounds { index, size }) => {
            assert_eq!(index, 5);
            assert_eq!(size, 2);
        }
        other => panic!("expected an out of bounds error, got {other:?}"),
    }
}

#[test]
fn wkt_round_trips_through_the_parser() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    let wgs84 = factory.create_object(ObjectType::GeographicCrs, "4326").expect("EPSG:4326");

    let mut format = ReferencingFormat::new(&context, Convention::Wkt2_2019);
    let wkt = format.format(&wgs84).expect("WKT export");
    let parsed = format.parse(&wkt).expect("WKT parse");

    assert_eq!(parsed.kind(), ObjectType::GeographicCrs);
    assert_eq!(parsed.name_string().expect("name"), Some(String::from("WGS 84")));
    assert!(parsed
        .is_equivalent_to(&wgs84, ComparisonCriterion::Equivalent)
        .expect("comparison"));

    assert!(matches!(format.parse("certainly not a CRS"), Err(Error::Unparsable(_))));
}

#[test]
fn compound_crs_presents_a_flat_axis_list() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    // Amersfoort / RD New + NAP height
    let compound = factory.create_object(ObjectType::CompoundCrs, "7415").expect("EPSG:7415");

    assert_eq!(compound.kind(), ObjectType::CompoundCrs);
    assert_eq!(compound.component_count().expect("components"), 2);
    assert_eq!(compound.axis_count().expect("axis count"), 3);
    let height = compound.axis(2).expect("third axis");
    assert_eq!(height.direction, "up");
    assert_eq!(height.unit.unit_type, UnitType::Linear);
}

#[test]
fn normalization_puts_longitude_first() {
    let context = Context::new().expect("context creation");
    let factory = epsg_factory(&context);
    let wgs84 = factory.create_object(ObjectType::GeographicCrs, "4326").expect("EPSG:4326");

    let normalized = wgs84.normalize_for_visualization().expect("normalization");
    assert_eq!(normalized.kind(), ObjectType::GeographicCrs);
    assert_eq!(normalized.axis_count().expect("axis count"), 2);
    assert_eq!(normalized.axis(0).expect("first axis").direction, "east");
    assert_eq!(normalized.axis(1).expect("second axis").direction, "north");
}

#[test]
fn user_defined_units_intern_once() {
    let foot = UnitOfMeasure::user_defined(UnitType::Linear, 0.3048);
    let again = UnitOfMeasure::user_defined(UnitType::Linear, 0.3048);
    assert_eq!(foot.identifier, again.identifier);
    assert!(foot.identifier >= 10);

    let other = UnitOfMeasure::user_defined(UnitType::Linear, 0.9144);
    assert_ne!(foot.identifier, other.identifier);

    let resolved = UnitOfMeasure::resolve(foot.identifier).expect("resolvable");
    assert_eq!(resolved.to_base, 0.3048);
    assert_eq!(resolved.unit_type, UnitType::Linear);
}
