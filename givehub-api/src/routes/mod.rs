/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login, and profile endpoints
/// - `campaigns`: Campaign CRUD endpoints
/// - `donations`: Donation recording and listing endpoints
/// - `analytics`: Reporting aggregate endpoints

pub mod analytics;
pub mod campaigns;
pub mod donations;
pub mod health;
pub mod users;
