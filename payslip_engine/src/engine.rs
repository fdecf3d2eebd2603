//! Derived payslip figures.
//!
//! The `engine` module turns a validated [`PayslipRecord`] into the
//! figures printed on a payslip: earnings and deductions totals, net
//! pay and net pay in words.  Net pay is always derived from the
//! salary components; any `netPay` written in the document is
//! ignored.  [`summarize_all`] uses the [`rayon`] crate to compute
//! the summaries of a multi-payslip document across CPU cores.

use crate::identity::{resolve_identity_with, IdentityView};
use crate::models::{Client, ComponentKind, PayslipDocument, PayslipRecord, SalaryComponent};
use crate::words::net_pay_in_words;
use rayon::prelude::*;
use serde::Serialize;

/// Components of the given kind, in document order.
pub fn lines_of(record: &PayslipRecord, kind: ComponentKind) -> Vec<&SalaryComponent> {
    record
        .salary_components
        .iter()
        .filter(|component| component.kind == kind)
        .collect()
}

pub fn earning_lines(record: &PayslipRecord) -> Vec<&SalaryComponent> {
    lines_of(record, ComponentKind::Earning)
}

pub fn deduction_lines(record: &PayslipRecord) -> Vec<&SalaryComponent> {
    lines_of(record, ComponentKind::Deduction)
}

fn total_of(record: &PayslipRecord, kind: ComponentKind) -> f64 {
    record
        .salary_components
        .iter()
        .filter(|component| component.kind == kind)
        .map(|component| component.amount)
        .sum()
}

pub fn total_earnings(record: &PayslipRecord) -> f64 {
    total_of(record, ComponentKind::Earning)
}

pub fn total_deductions(record: &PayslipRecord) -> f64 {
    total_of(record, ComponentKind::Deduction)
}

/// Earnings minus deductions.  This is the authoritative net pay.
pub fn net_pay(record: &PayslipRecord) -> f64 {
    total_earnings(record) - total_deductions(record)
}

/// File name the exported PDF of `record` is saved under.
pub fn export_filename(record: &PayslipRecord) -> String {
    format!(
        "payslip_{}_{}_{}.pdf",
        record.employee.id, record.month, record.year
    )
}

/// Everything a renderer or exporter needs to lay out one payslip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipSummary {
    pub index: usize,
    pub label: String,
    pub identity: IdentityView,
    pub earnings: Vec<SalaryComponent>,
    pub deductions: Vec<SalaryComponent>,
    pub total_earnings: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
    pub net_pay_in_words: String,
    pub currency: String,
    pub currency_symbol: String,
    pub export_filename: String,
}

/// Summary of the payslip at `index`, or `None` when out of range.
pub fn summarize(document: &PayslipDocument, index: usize) -> Option<PayslipSummary> {
    summarize_with(document, index, None)
}

/// Like [`summarize`], with a fallback client for identity resolution.
pub fn summarize_with(
    document: &PayslipDocument,
    index: usize,
    selected: Option<&Client>,
) -> Option<PayslipSummary> {
    let record = document.payslips.get(index)?;
    Some(summary_of(document, index, record, selected))
}

/// Summaries of every payslip in the document, in document order.
pub fn summarize_all(document: &PayslipDocument) -> Vec<PayslipSummary> {
    document
        .payslips
        .par_iter()
        .enumerate()
        .map(|(index, record)| summary_of(document, index, record, None))
        .collect()
}

fn summary_of(
    document: &PayslipDocument,
    index: usize,
    record: &PayslipRecord,
    selected: Option<&Client>,
) -> PayslipSummary {
    let identity = resolve_identity_with(document, record, selected);
    let earnings = total_earnings(record);
    let deductions = total_deductions(record);
    let net = earnings - deductions;
    PayslipSummary {
        index,
        label: record.selector_label(),
        identity: identity.to_view(),
        earnings: earning_lines(record).into_iter().cloned().collect(),
        deductions: deduction_lines(record).into_iter().cloned().collect(),
        total_earnings: earnings,
        total_deductions: deductions,
        net_pay: net,
        net_pay_in_words: net_pay_in_words(net),
        currency: record.currency.clone(),
        currency_symbol: record.currency_symbol.clone(),
        export_filename: export_filename(record),
    }
}
