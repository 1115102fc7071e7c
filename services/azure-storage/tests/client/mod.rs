mod list;
mod read;
mod sign_url;
mod upload;
