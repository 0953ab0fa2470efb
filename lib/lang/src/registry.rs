//! Static language table
//!
//! Every supported language is a descriptor with constructor functions for
//! its front end and feature extractor. Lookup is by name only.

use std::fmt;

use crate::clike::{CLikeFeatures, CLikeFrontEnd};
use crate::frontend::{FeatureExtractor, FrontEnd};
use codebuff_core::{Error, FeatureSchema, Result};

pub struct LangDescriptor {
    pub name: &'static str,
    /// Pattern selecting training files by file name
    pub file_glob: &'static str,
    pub tab_size: usize,
    pub front_end: fn() -> Box<dyn FrontEnd>,
    pub features: fn() -> Box<dyn FeatureExtractor>,
}

impl LangDescriptor {
    pub fn instantiate(&'static self) -> Language {
        Language {
            descriptor: self,
            front_end: (self.front_end)(),
            features: (self.features)(),
        }
    }
}

impl fmt::Debug for LangDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangDescriptor")
            .field("name", &self.name)
            .field("file_glob", &self.file_glob)
            .field("tab_size", &self.tab_size)
            .finish()
    }
}

fn java_front_end() -> Box<dyn FrontEnd> {
    Box::new(CLikeFrontEnd::java())
}

fn c_front_end() -> Box<dyn FrontEnd> {
    Box::new(CLikeFrontEnd::c())
}

fn clike_features() -> Box<dyn FeatureExtractor> {
    Box::new(CLikeFeatures::new())
}

pub static LANGUAGES: &[LangDescriptor] = &[
    LangDescriptor {
        name: "java",
        file_glob: "*.java",
        tab_size: 4,
        front_end: java_front_end,
        features: clike_features,
    },
    LangDescriptor {
        name: "c",
        file_glob: "*.{c,h}",
        tab_size: 4,
        front_end: c_front_end,
        features: clike_features,
    },
];

pub fn lookup(name: &str) -> Result<&'static LangDescriptor> {
    LANGUAGES
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnsupportedLanguage(name.to_string()))
}

pub fn names() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|d| d.name)
}

/// Instantiated front end and feature extractor for one language
pub struct Language {
    descriptor: &'static LangDescriptor,
    front_end: Box<dyn FrontEnd>,
    features: Box<dyn FeatureExtractor>,
}

impl Language {
    pub fn by_name(name: &str) -> Result<Self> {
        Ok(lookup(name)?.instantiate())
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    #[inline]
    pub fn tab_size(&self) -> usize {
        self.descriptor.tab_size
    }

    #[inline]
    pub fn file_glob(&self) -> &'static str {
        self.descriptor.file_glob
    }

    pub fn front_end(&self) -> &dyn FrontEnd {
        self.front_end.as_ref()
    }

    pub fn features(&self) -> &dyn FeatureExtractor {
        self.features.as_ref()
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.features.schema()
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language").field("name", &self.name()).finish()
    }
}
