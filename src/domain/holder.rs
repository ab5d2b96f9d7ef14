//! A generic flaggable object

use crate::domain::flags::{register_flag_handlers, FlagTracker, Flaggable, MemoryFlagTracker};
use crate::domain::tags::{TagMeta, TagProcessor};
use crate::domain::time::Clock;
use crate::domain::value::Value;
use std::sync::{Arc, OnceLock};

/// An object type that answers tags through its own processor
pub trait TagObject: Sized + 'static {
    fn tag_processor() -> &'static TagProcessor<Self>;
}

/// A named object holding flags in memory
#[derive(Debug)]
pub struct FlagHolder {
    name: String,
    flags: MemoryFlagTracker,
}

impl FlagHolder {
    pub fn new(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        FlagHolder {
            name: name.into(),
            flags: MemoryFlagTracker::new(clock),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> &MemoryFlagTracker {
        &self.flags
    }
}

impl Flaggable for FlagHolder {
    fn flag_tracker(&self) -> &dyn FlagTracker {
        &self.flags
    }
}

impl TagObject for FlagHolder {
    fn tag_processor() -> &'static TagProcessor<Self> {
        static PROCESSOR: OnceLock<TagProcessor<FlagHolder>> = OnceLock::new();
        PROCESSOR.get_or_init(|| {
            let mut processor = TagProcessor::new();
            processor.register_tag(
                TagMeta {
                    name: "name",
                    syntax: "name",
                    returns: "Element",
                    description: "Returns the name of the object.",
                },
                |_attribute, holder: &FlagHolder| Some(Value::element(holder.name())),
            );
            register_flag_handlers(&mut processor);
            processor
        })
    }
}
