// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod clients;
pub mod collaborators;
pub mod currency;
pub mod doctor;
pub mod exporter;
pub mod office;
pub mod onboarding;
pub mod projects;
pub mod reports;
