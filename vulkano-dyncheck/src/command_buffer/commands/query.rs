// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::{command_buffer::CommandRecorder, query::QueryType, ValidationError};

impl CommandRecorder {
    /// Begins a query of type `query_type`.
    ///
    /// Only the type of the query matters to draw-time validation; pools and indices are not
    /// tracked.
    pub fn begin_query(&mut self, query_type: QueryType) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_begin_query(query_type)
            .map_err(|err| self.recording_error("vkCmdBeginQuery", err))?;

        Ok(self.begin_query_unchecked(query_type))
    }

    fn validate_begin_query(&self, query_type: QueryType) -> Result<(), Box<ValidationError>> {
        query_type.validate_device(&self.device).map_err(|err| {
            err.add_context("query_type")
                .set_vuids(&["VUID-VkQueryPoolCreateInfo-queryType-parameter"])
        })?;

        if query_type == QueryType::Timestamp {
            return Err(Box::new(ValidationError {
                context: "query_type".into(),
                problem: "is `QueryType::Timestamp`".into(),
                vuids: &["VUID-vkCmdBeginQuery-queryType-02804"],
                ..Default::default()
            }));
        }

        if self.active_queries.contains(&query_type) {
            return Err(Box::new(ValidationError {
                problem: format!(
                    "a query of type `QueryType::{:?}` is already active",
                    query_type,
                )
                .into(),
                vuids: &["VUID-vkCmdBeginQuery-queryPool-01922"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn begin_query_unchecked(&mut self, query_type: QueryType) -> &mut Self {
        self.active_queries.push(query_type);
        self
    }

    /// Ends the active query of type `query_type`.
    pub fn end_query(&mut self, query_type: QueryType) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_end_query(query_type)
            .map_err(|err| self.recording_error("vkCmdEndQuery", err))?;

        Ok(self.end_query_unchecked(query_type))
    }

    fn validate_end_query(&self, query_type: QueryType) -> Result<(), Box<ValidationError>> {
        if !self.active_queries.contains(&query_type) {
            return Err(Box::new(ValidationError {
                problem: format!("no query of type `QueryType::{:?}` is active", query_type)
                    .into(),
                vuids: &["VUID-vkCmdEndQuery-None-01923"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn end_query_unchecked(&mut self, query_type: QueryType) -> &mut Self {
        self.active_queries.retain(|&mut active| active != query_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::CommandRecorder, diagnostic::DiagnosticCollector, query::QueryType,
        tests::full_device,
    };
    use std::sync::Arc;

    #[test]
    fn query_lifetime() {
        let mut recorder = CommandRecorder::new(
            Arc::new(full_device()),
            Arc::new(DiagnosticCollector::new()),
        );

        recorder.begin_query(QueryType::PrimitivesGenerated).unwrap();
        assert!(recorder.is_query_active(QueryType::PrimitivesGenerated));
        assert!(!recorder.is_query_active(QueryType::Occlusion));

        let err = recorder
            .begin_query(QueryType::PrimitivesGenerated)
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdBeginQuery-queryPool-01922"]);

        recorder.end_query(QueryType::PrimitivesGenerated).unwrap();
        assert!(!recorder.is_query_active(QueryType::PrimitivesGenerated));

        let err = recorder.end_query(QueryType::Occlusion).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdEndQuery-None-01923"]);
    }
}
