//! Context features for C-family boundaries

use crate::frontend::{FeatureExtractor, ParsedDocument};
use crate::token::EOF;
use codebuff_core::{FeatureMetaData, FeatureSchema, FeatureVector};

pub const PREV_PREV_TYPE: usize = 0;
pub const PREV_TYPE: usize = 1;
pub const CUR_TYPE: usize = 2;
pub const NEXT_TYPE: usize = 3;
pub const PREV_RULE: usize = 4;
pub const CUR_RULE: usize = 5;
pub const DEPTH_DELTA: usize = 6;
pub const PREV_FIRST_ON_LINE: usize = 7;
pub const SAME_RULE: usize = 8;
pub const LINE_WIDTH: usize = 9;

/// Code for "no token here" (before the start of the document)
const MISSING: i32 = -1;

const MAX_DEPTH_DELTA: i32 = 3;

pub struct CLikeFeatures {
    schema: FeatureSchema,
}

impl CLikeFeatures {
    pub fn new() -> Self {
        Self {
            schema: Self::default_schema(),
        }
    }

    pub fn with_schema(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn default_schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            FeatureMetaData::token("prev_prev_type", 1.0),
            FeatureMetaData::token("prev_type", 2.0),
            FeatureMetaData::token("cur_type", 2.0),
            FeatureMetaData::token("next_type", 1.0),
            FeatureMetaData::rule("prev_rule", 1.0),
            FeatureMetaData::rule("cur_rule", 1.0),
            FeatureMetaData::int("depth_delta", 1.0),
            FeatureMetaData::boolean("prev_first_on_line", 0.5),
            FeatureMetaData::boolean("same_rule", 0.5),
            FeatureMetaData::colwidth("line_width"),
        ])
    }
}

impl Default for CLikeFeatures {
    fn default() -> Self {
        Self::new()
    }
}

fn first_on_line(doc: &ParsedDocument, k: usize) -> bool {
    match (k.checked_sub(1).and_then(|j| doc.real(j)), doc.real(k)) {
        (Some(before), Some(token)) => before.line != token.line,
        _ => true,
    }
}

impl FeatureExtractor for CLikeFeatures {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn extract(&self, doc: &ParsedDocument, k: usize) -> FeatureVector {
        let type_at = |j: Option<usize>, absent: i32| {
            j.and_then(|j| doc.real(j)).map_or(absent, |t| t.token_type as i32)
        };
        let prev = k.checked_sub(1);
        let cur_node = doc.rule_of(k);

        let mut data = vec![0; LINE_WIDTH + 1];
        data[PREV_PREV_TYPE] = type_at(k.checked_sub(2), MISSING);
        data[PREV_TYPE] = type_at(prev, MISSING);
        data[CUR_TYPE] = type_at(Some(k), EOF as i32);
        data[NEXT_TYPE] = type_at(Some(k + 1), EOF as i32);
        data[PREV_RULE] = prev.map_or(MISSING, |j| doc.rule_of(j).kind.code());
        data[CUR_RULE] = cur_node.kind.code();

        if let Some(j) = prev {
            let delta = cur_node.depth as i32 - doc.rule_of(j).depth as i32;
            data[DEPTH_DELTA] = delta.clamp(-MAX_DEPTH_DELTA, MAX_DEPTH_DELTA);
            data[PREV_FIRST_ON_LINE] = first_on_line(doc, j) as i32;
            data[SAME_RULE] = (doc.tree.rule_id_of(j) == doc.tree.rule_id_of(k)) as i32;
            data[LINE_WIDTH] = doc.real(j).map_or(0, |t| t.end_position().1 as i32);
        }

        FeatureVector::new(data)
    }
}
