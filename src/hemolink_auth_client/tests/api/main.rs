mod guard;
mod helpers;
mod refresh;
mod restore;
mod sign_in;
