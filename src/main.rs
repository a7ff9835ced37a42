
use scode_trainer::Pipeline;

fn main() {
    Pipeline::run();
}
