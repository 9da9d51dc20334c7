mod scenarios;
mod routing;
