mod guard;
mod helpers;
mod login;
mod profile;
