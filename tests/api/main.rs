
mod accounts;
mod favorites;
mod health_check;
