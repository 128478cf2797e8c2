//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Implementing core business rules and validation
//! - **Orchestration**: Coordinating repository calls with the weather, Discord and OCR APIs
//! - **Domain Models**: Working with domain models rather than DTOs or entity models

pub mod admin;
pub mod auth;
pub mod cccd;
pub mod discord;
pub mod notification;
pub mod user;
pub mod weather;
pub mod webhook;
