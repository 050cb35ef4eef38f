#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod authorityfactory;
mod axis;
mod context;
mod error;
mod handle;
mod identifiedobject;
mod identifier;
mod objectcache;
mod objectfactory;
mod objecttype;
mod parameter;
mod projinterop;
mod property;
mod referencingformat;
mod runtimeconfiguration;
mod transform;
pub mod units;

pub use authorityfactory::AuthorityFactory;
pub use authorityfactory::CrsExtentUse;
pub use authorityfactory::GridAvailabilityUse;
pub use authorityfactory::IntermediateCrsUse;
pub use authorityfactory::OperationSearch;
pub use authorityfactory::SpatialCriterion;
pub use axis::Axis;
pub use context::Context;
#[doc(inline)]
pub use error::Error;
pub use identifiedobject::ComparisonCriterion;
#[doc(inline)]
pub use identifiedobject::IdentifiedObject;
pub use identifier::Identifier;
pub use objectfactory::ObjectFactory;
pub use objectfactory::ObjectProperties;
#[doc(inline)]
pub use objecttype::ObjectType;
pub use parameter::OperationMethod;
pub use parameter::Parameter;
pub use parameter::ParameterKind;
pub use projinterop::engine_version;
pub use projinterop::EngineVersion;
#[doc(inline)]
pub use property::Property;
pub use property::PropertyValue;
pub use referencingformat::Convention;
pub use referencingformat::ReferencingFormat;
pub use runtimeconfiguration::RuntimeConfiguration;
pub use transform::CompiledTransform;
#[doc(inline)]
pub use units::UnitOfMeasure;
pub use units::UnitType;
