pub mod athlete_service;
pub mod auth_service;
pub mod match_service;
pub mod notification_service;
pub mod team_service;
pub mod user_service;

pub use athlete_service::{AthleteService, AthleteServiceImpl};
pub use auth_service::{AuthService, AuthServiceImpl};
pub use match_service::{MatchService, MatchServiceImpl};
pub use notification_service::{NotificationService, NotificationServiceImpl};
pub use team_service::{TeamService, TeamServiceImpl};
pub use user_service::{UserService, UserServiceImpl};
