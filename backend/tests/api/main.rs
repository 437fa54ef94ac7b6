mod storage;
mod users;
