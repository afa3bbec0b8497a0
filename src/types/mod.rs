pub mod app_state;
pub mod city_records;
pub mod weather_payload;
