// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Hand-off of projected records to the aggregation engine.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::call::PreparedCall;
use crate::error::DispatchError;
use crate::source::{Scope, Source, TopologySource};

/// Downstream consumer of topology sources, typically the metrics aggregation engine.
pub trait SourceReceiver {
    fn receive(&mut self, source: TopologySource) -> Result<(), DispatchError>;
}

impl SourceReceiver for Vec<TopologySource> {
    fn receive(&mut self, source: TopologySource) -> Result<(), DispatchError> {
        self.push(source);
        Ok(())
    }
}

impl SourceReceiver for UnboundedSender<TopologySource> {
    fn receive(&mut self, source: TopologySource) -> Result<(), DispatchError> {
        self.send(source)
            .map_err(|err| DispatchError::ReceiverClosed(err.0.scope()))
    }
}

impl PreparedCall {
    /// Runs every projection and hands each produced record to `receiver`, exactly once.
    ///
    /// Suppressed projections are skipped with a debug log. Stops at the first receiver error.
    /// Returns how many records were delivered.
    pub fn dispatch<R>(&self, receiver: &mut R) -> Result<usize, DispatchError>
    where
        R: SourceReceiver + ?Sized,
    {
        let sources: [(Scope, Option<TopologySource>); 9] = [
            (Scope::All, Some(self.to_global_traffic().into())),
            (Scope::Service, Some(self.to_service().into())),
            (Scope::ServiceInstance, Some(self.to_service_instance().into())),
            (Scope::Endpoint, Some(self.to_endpoint().into())),
            (
                Scope::ServiceRelation,
                Some(self.to_service_relation().into()),
            ),
            (
                Scope::ServiceInstanceRelation,
                self.to_service_instance_relation().map(Into::into),
            ),
            (
                Scope::EndpointRelation,
                self.to_endpoint_relation().map(Into::into),
            ),
            (Scope::ServiceMeta, Some(self.to_service_meta().into())),
            (
                Scope::DatabaseAccess,
                self.to_database_access().map(Into::into),
            ),
        ];

        let mut delivered = 0;
        for (scope, source) in sources {
            match source {
                Some(source) => {
                    receiver.receive(source)?;
                    delivered += 1;
                }
                None => debug!(%scope, "Call does not produce this source, skipping"),
            }
        }
        Ok(delivered)
    }
}
