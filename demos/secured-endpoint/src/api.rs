// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Endpoint running every call through the gate.

use std::sync::Arc;

use jel::{AccessGate, CallSite, EvaluatorRegistry, GateError};

use crate::{
    auth::Claims,
    markers::SecuredBy,
    orders::{Orders, Reports}
};

/// Orders endpoint.
pub struct OrdersApi {
    gate:   AccessGate<Claims>,
    orders: Orders
}

impl OrdersApi {
    /// Endpoint over `orders`, resolving rules from `registry`.
    pub fn new(registry: Arc<EvaluatorRegistry>, orders: Orders) -> Self {
        Self {
            gate: AccessGate::for_marker::<SecuredBy>(registry),
            orders
        }
    }

    /// Gate used by this endpoint.
    pub fn gate(&self) -> &AccessGate<Claims> {
        &self.gate
    }

    /// List orders.
    ///
    /// # Errors
    ///
    /// [`GateError`] when the caller is not allowed.
    pub fn list(&self, claims: &Claims) -> Result<Vec<String>, GateError> {
        self.gate
            .guard(&CallSite::method::<Orders>("list"), claims, || self.orders.list())
    }

    /// Delete every order.
    ///
    /// # Errors
    ///
    /// [`GateError`] when the caller is not allowed.
    pub fn delete_all(&self, claims: &Claims) -> Result<usize, GateError> {
        self.gate.guard(&CallSite::method::<Orders>("delete_all"), claims, || {
            self.orders.delete_all()
        })
    }

    /// Export orders.
    ///
    /// # Errors
    ///
    /// [`GateError`] when the caller is not allowed; the export does not start.
    pub async fn export(&self, claims: &Claims) -> Result<String, GateError> {
        self.gate
            .guard_async(&CallSite::method::<Orders>("export"), claims, || self.orders.export())
            .await
    }

    /// Audit orders.
    ///
    /// # Errors
    ///
    /// Always [`GateError::Evaluation`]: the rule panics.
    pub fn audit(&self, claims: &Claims) -> Result<usize, GateError> {
        self.gate
            .guard(&CallSite::method::<Orders>("audit"), claims, || self.orders.audit())
    }

    /// Count orders through a call site without a rule.
    ///
    /// # Errors
    ///
    /// Always [`GateError::Binding`].
    pub fn count(&self, claims: &Claims) -> Result<usize, GateError> {
        self.gate
            .guard(&CallSite::method::<Orders>("count"), claims, || self.orders.count())
    }

    /// Monthly report, gated on the [`Reports`] type.
    ///
    /// # Errors
    ///
    /// [`GateError`] when the caller is not allowed.
    pub fn monthly_report(&self, claims: &Claims) -> Result<&'static str, GateError> {
        self.gate
            .guard(&CallSite::of_type::<Reports>(), claims, || Reports.monthly())
    }
}
