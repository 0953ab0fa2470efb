//! Small Java sources in one consistent style

pub const BLOCK: &str = "{\n    x = y + z;\n    w = v * u;\n}";

pub const BLOCK_SQUASHED: &str = "{a=b+c;d=e*f;}";

pub const BLOCK_EXPECTED: &str = "{\n    a = b + c;\n    d = e * f;\n}";

pub const POINT: &str = "class Point {
    int x;
    int y;
    int sum(int a, int b) {
        int c = a + b;
        return c * x;
    }
}";

pub const POINT_SQUASHED: &str = "class Point{int x;int y;int sum(int a,int b){int c=a+b;return c*x;}}";
