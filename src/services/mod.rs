pub mod city_store;
pub mod weather_client;
pub mod weather_orchestrator;
