pub mod catalog_service;
pub mod expense_service;
pub mod extraction_service;
pub mod itinerary_generation_service;
pub mod pricing_service;
pub mod random_source;
pub mod remote_plan;
pub mod scheduling_service;
pub mod trip_planner_service;
