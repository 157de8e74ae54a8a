pub mod strava_server;
